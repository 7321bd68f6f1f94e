// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::emitter::MetricSink;
use crate::engine::CollectionEngine;
use crate::format::MessageFormat;
use crate::gatherer::LogsGatherer;
use crate::schema::{MetricDescriptor, MetricSchema};

/// Default bound on each individual outcome wait during aggregation.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Default ceiling on concurrent per-group fetches.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Construction-time settings for the exporter. All fields are immutable
/// once the exporter is built.
pub struct ExporterConfig {
    /// The AWS region the exporter scrapes; carried as a label on every
    /// sample.
    pub region: String,
    /// Optional JSON template applied to each log message.
    pub message_format: Option<MessageFormat>,
    /// Bound on each individual outcome wait.
    pub fetch_timeout: Duration,
    /// Ceiling on concurrent per-group fetches.
    pub max_in_flight: usize,
}

impl ExporterConfig {
    pub fn new(region: impl Into<String>) -> Self {
        ExporterConfig {
            region: region.into(),
            message_format: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// The externally visible collector.
///
/// `describe` enumerates every metric the engine can ever emit; `collect`
/// drives exactly one collection cycle. A scrape lock guarantees at most one
/// in-flight cycle per exporter instance regardless of scrape concurrency,
/// bounding the load placed on the AWS API.
pub struct Exporter {
    engine: CollectionEngine,
    schema: MetricSchema,
    scrape_lock: Mutex<()>,
}

impl Exporter {
    pub fn new(gatherer: Arc<dyn LogsGatherer>, config: ExporterConfig) -> Self {
        Exporter {
            engine: CollectionEngine::new(
                gatherer,
                config.region,
                config.message_format,
                config.fetch_timeout,
                config.max_in_flight,
            ),
            schema: MetricSchema::new(),
            scrape_lock: Mutex::new(()),
        }
    }

    /// The static descriptor table, independent of any cycle.
    pub fn describe(&self) -> &[MetricDescriptor] {
        self.schema.descriptors()
    }

    /// Runs one collection cycle against the given sink. A concurrent call
    /// blocks until the in-flight cycle finishes. Never returns an error: a
    /// failed cycle still produces a complete sample set with `up` = 0.
    pub async fn collect(&self, sink: Arc<dyn MetricSink>) {
        let _guard = self.scrape_lock.lock().await;
        self.engine.run_cycle(sink).await;
    }
}
