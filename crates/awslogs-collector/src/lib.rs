// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Collection engine for the AWS Logs exporter.
//!
//! One scrape drives one collection cycle: list the log groups in a region,
//! fan out one concurrent fetch per group for recent events, aggregate the
//! per-group outcomes into a single binary health gauge, and render the
//! whole set as a point-in-time Prometheus snapshot.

pub mod aws;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod exporter;
pub mod exposition;
pub mod format;
pub mod gatherer;
pub mod schema;
pub mod server;
