// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The collection engine: one full gather-and-emit cycle per scrape.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::emitter::{MetricSink, SampleEmitter};
use crate::error::GatherError;
use crate::format::MessageFormat;
use crate::gatherer::{LogGroupEvents, LogsGatherer};
use crate::schema::Sample;

/// Orchestrates one collection cycle.
///
/// The cycle lists log groups, spawns one worker per group to fetch its
/// recent events, and aggregates the per-worker outcomes into a single
/// binary `up` sample. Each outcome wait is individually bounded by
/// `fetch_timeout`; the timeout re-arms per outcome received, so the worst
/// case is N times the timeout when workers stall one after another. The
/// first failed or timed-out outcome settles the aggregate at 0 and stops
/// the wait; abandoned workers run to completion in the background and have
/// their emissions rejected by the emitter.
pub struct CollectionEngine {
    gatherer: Arc<dyn LogsGatherer>,
    region: String,
    message_format: Option<MessageFormat>,
    fetch_timeout: Duration,
    max_in_flight: usize,
}

impl CollectionEngine {
    pub fn new(
        gatherer: Arc<dyn LogsGatherer>,
        region: String,
        message_format: Option<MessageFormat>,
        fetch_timeout: Duration,
        max_in_flight: usize,
    ) -> Self {
        CollectionEngine {
            gatherer,
            region,
            message_format,
            fetch_timeout,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Runs one cycle against the given sink. Never returns an error: every
    /// failure is absorbed into the `up` sample, which is always the last
    /// sample of the cycle.
    pub async fn run_cycle(&self, sink: Arc<dyn MetricSink>) {
        debug!("Start collecting");
        let cancel = CancellationToken::new();
        let emitter = SampleEmitter::new(sink, cancel.clone());

        let groups = match self.gatherer.list_log_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                error!("Error listing log groups: {e}");
                if let Err(e) = emitter.send(Sample::up(&self.region, 0.0)) {
                    error!("Failed to emit health sample: {e}");
                }
                cancel.cancel();
                return;
            }
        };

        if let Err(e) = emitter.send(Sample::log_group_count(&self.region, groups.len())) {
            error!("Failed to emit log group count: {e}");
        }

        let total = groups.len();
        let (outcome_tx, mut outcome_rx) =
            mpsc::channel::<Result<(), GatherError>>(total.max(1));
        let limiter = Arc::new(Semaphore::new(self.max_in_flight));

        for group in groups {
            let gatherer = Arc::clone(&self.gatherer);
            let emitter = emitter.clone();
            let region = self.region.clone();
            let message_format = self.message_format.clone();
            let limiter = Arc::clone(&limiter);
            let outcome_tx = outcome_tx.clone();

            tokio::spawn(async move {
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                let outcome = match gatherer.fetch_log_events(&group).await {
                    Ok(events) => {
                        emit_group_samples(&emitter, &region, message_format.as_ref(), &events);
                        Ok(())
                    }
                    Err(e) => {
                        error!("Error fetching log events for group {}: {e}", group.name);
                        Err(e)
                    }
                };
                let _ = outcome_tx.send(outcome).await;
            });
        }
        drop(outcome_tx);

        let mut result = 1.0;
        for _ in 0..total {
            match timeout(self.fetch_timeout, outcome_rx.recv()).await {
                Ok(Some(Ok(()))) => {}
                Ok(Some(Err(_))) => {
                    result = 0.0;
                    break;
                }
                Ok(None) => {
                    // A worker went away without reporting.
                    result = 0.0;
                    break;
                }
                Err(_) => {
                    error!(
                        "Timeout collecting metrics: waited {:?} without an outcome",
                        self.fetch_timeout
                    );
                    result = 0.0;
                    break;
                }
            }
        }

        if let Err(e) = emitter.send(Sample::up(&self.region, result)) {
            error!("Failed to emit health sample: {e}");
        }
        cancel.cancel();
        debug!("Finished collecting");
    }
}

fn emit_group_samples(
    emitter: &SampleEmitter,
    region: &str,
    message_format: Option<&MessageFormat>,
    events: &LogGroupEvents,
) {
    if let Err(e) = emitter.send(Sample::log_message_count(
        region,
        &events.group.name,
        events.events.len(),
    )) {
        error!("Failed to emit log message count: {e}");
    }

    for event in &events.events {
        let message = match message_format {
            Some(format) => format.apply(&event.message),
            None => event.message.clone(),
        };
        let date = format_event_date(event.timestamp_millis);
        if let Err(e) = emitter.send(Sample::log_message(
            region,
            &events.group.name,
            &message,
            &date,
        )) {
            error!("Failed to emit log message sample: {e}");
        }
    }
}

/// RFC 3339 rendering of an event timestamp for the `date` label. Timestamps
/// outside chrono's representable range fall back to the raw millisecond
/// value.
fn format_event_date(timestamp_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_millis) {
        Some(date) => date.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => timestamp_millis.to_string(),
    }
}
