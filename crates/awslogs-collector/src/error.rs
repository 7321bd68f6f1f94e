// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors reported by a [`crate::gatherer::LogsGatherer`] implementation.
///
/// A listing failure is fatal to the whole collection cycle; a per-group
/// fetch failure only contributes one failed outcome to the cycle aggregate.
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error("log source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Errors reported by the sample emitter.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The cycle has already been abandoned; the sample was not written.
    #[error("collection cycle already abandoned")]
    CycleAbandoned,

    /// The underlying sink rejected the sample.
    #[error("sink rejected sample: {0}")]
    Sink(String),
}
