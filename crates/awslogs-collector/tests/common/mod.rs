// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the collector: a scriptable gatherer and a recording sink.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use awslogs_collector::emitter::MetricSink;
use awslogs_collector::error::{EmitError, GatherError};
use awslogs_collector::gatherer::{LogEvent, LogGroup, LogGroupEvents, LogsGatherer};
use awslogs_collector::schema::Sample;

pub fn group(name: &str) -> LogGroup {
    LogGroup {
        id: format!("arn:aws:logs:us-east-1:123456789012:log-group:{name}"),
        name: name.to_string(),
    }
}

pub fn event(timestamp_millis: i64, message: &str) -> LogEvent {
    LogEvent {
        timestamp_millis,
        message: message.to_string(),
    }
}

/// Per-group behavior of the mock gatherer.
pub enum FetchBehavior {
    /// Return these events.
    Events(Vec<LogEvent>),
    /// Fail with `SourceUnavailable`.
    Fail,
    /// Never complete.
    Hang,
    /// Sleep, then return these events.
    Delay(Duration, Vec<LogEvent>),
    /// Sleep, then fail with `SourceUnavailable`.
    DelayFail(Duration),
}

/// Scriptable gatherer: a fixed listing plus one behavior per group name.
pub struct MockGatherer {
    groups: Vec<LogGroup>,
    behaviors: HashMap<String, FetchBehavior>,
    fail_listing: bool,
}

impl MockGatherer {
    pub fn new(groups: Vec<LogGroup>) -> Self {
        MockGatherer {
            groups,
            behaviors: HashMap::new(),
            fail_listing: false,
        }
    }

    pub fn failing_listing() -> Self {
        MockGatherer {
            groups: Vec::new(),
            behaviors: HashMap::new(),
            fail_listing: true,
        }
    }

    pub fn with_behavior(mut self, group_name: &str, behavior: FetchBehavior) -> Self {
        self.behaviors.insert(group_name.to_string(), behavior);
        self
    }
}

#[async_trait]
impl LogsGatherer for MockGatherer {
    async fn list_log_groups(&self) -> Result<Vec<LogGroup>, GatherError> {
        if self.fail_listing {
            return Err(GatherError::SourceUnavailable("listing failed".to_string()));
        }
        Ok(self.groups.clone())
    }

    async fn fetch_log_events(&self, group: &LogGroup) -> Result<LogGroupEvents, GatherError> {
        match self.behaviors.get(&group.name) {
            Some(FetchBehavior::Events(events)) => Ok(LogGroupEvents {
                group: group.clone(),
                events: events.clone(),
            }),
            Some(FetchBehavior::Fail) => Err(GatherError::SourceUnavailable(format!(
                "fetch failed for {}",
                group.name
            ))),
            Some(FetchBehavior::Hang) => std::future::pending().await,
            Some(FetchBehavior::Delay(delay, events)) => {
                tokio::time::sleep(*delay).await;
                Ok(LogGroupEvents {
                    group: group.clone(),
                    events: events.clone(),
                })
            }
            Some(FetchBehavior::DelayFail(delay)) => {
                tokio::time::sleep(*delay).await;
                Err(GatherError::SourceUnavailable(format!(
                    "fetch failed for {}",
                    group.name
                )))
            }
            None => Ok(LogGroupEvents {
                group: group.clone(),
                events: Vec::new(),
            }),
        }
    }
}

/// Gatherer that records whether two listings ever ran concurrently.
#[derive(Default)]
pub struct SerializationProbe {
    active: AtomicUsize,
    overlapped: AtomicBool,
}

impl SerializationProbe {
    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogsGatherer for SerializationProbe {
    async fn list_log_groups(&self) -> Result<Vec<LogGroup>, GatherError> {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn fetch_log_events(&self, group: &LogGroup) -> Result<LogGroupEvents, GatherError> {
        Ok(LogGroupEvents {
            group: group.clone(),
            events: Vec::new(),
        })
    }
}

/// Sink that records every sample in emission order.
#[derive(Default)]
pub struct RecordingSink {
    samples: Mutex<Vec<Sample>>,
}

impl RecordingSink {
    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap().clone()
    }

    /// Samples with the given metric name, in emission order.
    pub fn samples_for(&self, name: &str) -> Vec<Sample> {
        self.samples()
            .into_iter()
            .filter(|s| s.name == name)
            .collect()
    }

    /// Value of the sample for `name` whose labels start with `label_prefix`.
    pub fn value_for(&self, name: &str, label_prefix: &[&str]) -> Option<f64> {
        self.samples()
            .into_iter()
            .find(|s| {
                s.name == name
                    && s.label_values.len() >= label_prefix.len()
                    && s.label_values
                        .iter()
                        .zip(label_prefix)
                        .all(|(value, expected)| value == expected)
            })
            .map(|s| s.value)
    }
}

impl MetricSink for RecordingSink {
    fn record(&self, sample: Sample) -> Result<(), EmitError> {
        self.samples.lock().unwrap().push(sample);
        Ok(())
    }
}
