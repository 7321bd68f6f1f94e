// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::GatherError;

/// One CloudWatch log group, as returned by the listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroup {
    /// ARN of the log group.
    pub id: String,
    /// Name of the log group, used for filtering and as a metric label.
    pub name: String,
}

/// One log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Event timestamp in milliseconds since the epoch.
    pub timestamp_millis: i64,
    /// Free-text event body.
    pub message: String,
}

/// The events fetched for one log group within the history window.
///
/// `events` is ordered newest-first by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroupEvents {
    pub group: LogGroup,
    pub events: Vec<LogEvent>,
}

/// The contract the collection engine gathers log data through.
///
/// Implementations apply any name-prefix filtering during listing, not
/// after; the engine never filters. Neither operation retries on its own.
#[async_trait]
pub trait LogsGatherer: Send + Sync {
    /// Lists the log groups in scope. Failure is fatal to the cycle.
    async fn list_log_groups(&self) -> Result<Vec<LogGroup>, GatherError>;

    /// Fetches the recent events for one log group, ordered newest-first.
    /// Failure is local to the group's worker, not fatal to the cycle.
    async fn fetch_log_events(&self, group: &LogGroup) -> Result<LogGroupEvents, GatherError>;
}
