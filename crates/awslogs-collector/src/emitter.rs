// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::EmitError;
use crate::schema::Sample;

/// Destination for emitted samples. Implementations are expected not to fail
/// under normal operation, but the contract tolerates rejection.
pub trait MetricSink: Send + Sync {
    fn record(&self, sample: Sample) -> Result<(), EmitError>;
}

/// Cancellation-aware wrapper around a metric sink.
///
/// Once the cycle's cancellation token fires, every subsequent `send` returns
/// [`EmitError::CycleAbandoned`] without touching the sink. Workers that
/// finish after the cycle has been abandoned would otherwise write to a
/// destination the scrape handler has already torn down.
#[derive(Clone)]
pub struct SampleEmitter {
    sink: Arc<dyn MetricSink>,
    cancel: CancellationToken,
}

impl SampleEmitter {
    pub fn new(sink: Arc<dyn MetricSink>, cancel: CancellationToken) -> Self {
        SampleEmitter { sink, cancel }
    }

    /// Forwards one sample to the sink, unless the cycle is abandoned.
    /// Every call is a distinct observation; there is no buffering.
    pub fn send(&self, sample: Sample) -> Result<(), EmitError> {
        if self.cancel.is_cancelled() {
            return Err(EmitError::CycleAbandoned);
        }
        self.sink.record(sample)
    }
}
