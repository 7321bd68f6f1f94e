// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! CloudWatch Logs implementation of the gatherer contract.

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::Client;
use chrono::Utc;
use tracing::debug;

use crate::error::GatherError;
use crate::gatherer::{LogEvent, LogGroup, LogGroupEvents, LogsGatherer};

/// Gathers log groups and events from the CloudWatch Logs API.
///
/// The group name prefix filter is applied in the `DescribeLogGroups` call
/// itself; events are fetched with `FilterLogEvents` over a trailing history
/// window measured backward from the time of the call.
pub struct AwsLogsGatherer {
    client: Client,
    group_name_prefix: Option<String>,
    history_secs: i64,
}

impl AwsLogsGatherer {
    pub fn new(client: Client, group_name_prefix: Option<String>, history_secs: i64) -> Self {
        AwsLogsGatherer {
            client,
            group_name_prefix,
            history_secs,
        }
    }
}

#[async_trait]
impl LogsGatherer for AwsLogsGatherer {
    async fn list_log_groups(&self) -> Result<Vec<LogGroup>, GatherError> {
        debug!("Listing log groups");
        let resp = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(self.group_name_prefix.clone())
            .send()
            .await
            .map_err(|e| GatherError::SourceUnavailable(DisplayErrorContext(e).to_string()))?;

        let groups: Vec<LogGroup> = resp
            .log_groups()
            .iter()
            .map(|g| LogGroup {
                id: g.arn().unwrap_or_default().to_string(),
                name: g.log_group_name().unwrap_or_default().to_string(),
            })
            .collect();

        debug!("Got {} log groups", groups.len());
        Ok(groups)
    }

    async fn fetch_log_events(&self, group: &LogGroup) -> Result<LogGroupEvents, GatherError> {
        let start_time = window_start_millis(Utc::now().timestamp(), self.history_secs);

        debug!("Fetching log events for group {}", group.name);
        let resp = self
            .client
            .filter_log_events()
            .log_group_name(&group.name)
            .start_time(start_time)
            .send()
            .await
            .map_err(|e| GatherError::SourceUnavailable(DisplayErrorContext(e).to_string()))?;

        let mut events: Vec<LogEvent> = resp
            .events()
            .iter()
            .map(|e| LogEvent {
                timestamp_millis: e.timestamp().unwrap_or_default(),
                message: e.message().unwrap_or_default().to_string(),
            })
            .collect();
        sort_newest_first(&mut events);

        debug!("Got {} log events for group {}", events.len(), group.name);
        Ok(LogGroupEvents {
            group: group.clone(),
            events,
        })
    }
}

/// Start of the trailing history window, in milliseconds since the epoch.
fn window_start_millis(now_secs: i64, history_secs: i64) -> i64 {
    (now_secs - history_secs) * 1000
}

fn sort_newest_first(events: &mut [LogEvent]) {
    events.sort_by(|a, b| b.timestamp_millis.cmp(&a.timestamp_millis));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp_millis: i64, message: &str) -> LogEvent {
        LogEvent {
            timestamp_millis,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_window_start_millis() {
        assert_eq!(window_start_millis(1_700_000_000, 3600), 1_699_996_400_000);
    }

    #[test]
    fn test_window_start_millis_zero_history() {
        assert_eq!(window_start_millis(1_700_000_000, 0), 1_700_000_000_000);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut events = vec![event(10, "old"), event(30, "new"), event(20, "mid")];
        sort_newest_first(&mut events);
        assert_eq!(
            events,
            vec![event(30, "new"), event(20, "mid"), event(10, "old")]
        );
    }

    #[test]
    fn test_sort_newest_first_is_stable_for_equal_timestamps() {
        let mut events = vec![event(10, "first"), event(10, "second")];
        sort_newest_first(&mut events);
        assert_eq!(events, vec![event(10, "first"), event(10, "second")]);
    }
}
