// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Metric names, descriptors, and sample constructors.
//!
//! The descriptor table is built once at exporter creation and held as
//! exporter-owned state; nothing here registers into process-global state.

/// Metric name prefix shared by every sample this exporter emits.
pub const NAMESPACE: &str = "awslogs";

/// Was the last query of AWS Logs successful.
pub const UP: &str = "awslogs_up";
/// The total number of log groups.
pub const LOG_GROUP_COUNT: &str = "awslogs_log_group_count";
/// The total number of log messages within the history window.
pub const LOG_MESSAGE_COUNT: &str = "awslogs_log_message_count";
/// A log event message.
pub const LOG_MESSAGE: &str = "awslogs_log_message";

/// Describes one metric the engine can emit: name, help text, and the fixed
/// label schema its samples carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

/// The full set of metrics this exporter can ever emit.
#[derive(Debug, Clone)]
pub struct MetricSchema {
    descriptors: Vec<MetricDescriptor>,
}

impl MetricSchema {
    pub fn new() -> Self {
        MetricSchema {
            descriptors: vec![
                MetricDescriptor {
                    name: UP,
                    help: "Was the last query of AWS Logs successful.",
                    labels: &["region"],
                },
                MetricDescriptor {
                    name: LOG_GROUP_COUNT,
                    help: "The total number of log groups.",
                    labels: &["region"],
                },
                MetricDescriptor {
                    name: LOG_MESSAGE_COUNT,
                    help: "The total number of log messages within start time.",
                    labels: &["region", "group"],
                },
                MetricDescriptor {
                    name: LOG_MESSAGE,
                    help: "A log event message.",
                    labels: &["region", "group", "message", "date"],
                },
            ],
        }
    }

    pub fn descriptors(&self) -> &[MetricDescriptor] {
        &self.descriptors
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// One emitted metric observation. Label values are ordered to match the
/// label schema of the named descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl Sample {
    pub fn up(region: &str, value: f64) -> Sample {
        Sample {
            name: UP,
            value,
            label_values: vec![region.to_string()],
        }
    }

    pub fn log_group_count(region: &str, count: usize) -> Sample {
        Sample {
            name: LOG_GROUP_COUNT,
            value: count as f64,
            label_values: vec![region.to_string()],
        }
    }

    pub fn log_message_count(region: &str, group: &str, count: usize) -> Sample {
        Sample {
            name: LOG_MESSAGE_COUNT,
            value: count as f64,
            label_values: vec![region.to_string(), group.to_string()],
        }
    }

    pub fn log_message(region: &str, group: &str, message: &str, date: &str) -> Sample {
        Sample {
            name: LOG_MESSAGE,
            value: 1.0,
            label_values: vec![
                region.to_string(),
                group.to_string(),
                message.to_string(),
                date.to_string(),
            ],
        }
    }
}
