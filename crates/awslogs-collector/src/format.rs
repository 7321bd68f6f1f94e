// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Optional JSON log-line formatting.
//!
//! When a message format like `{name}: {message}` is configured, log lines
//! that parse as JSON objects are rendered through the template before being
//! emitted as the `awslogs_log_message` sample. Lines that are not JSON
//! objects pass through unchanged.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

#[allow(clippy::expect_used)]
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("valid placeholder regex"))
}

/// A parsed message template. Placeholders name top-level fields of the JSON
/// log line; a missing field renders as the empty string, and non-string
/// values render as compact JSON.
#[derive(Debug, Clone)]
pub struct MessageFormat {
    template: String,
}

impl MessageFormat {
    pub fn new(template: impl Into<String>) -> Self {
        MessageFormat {
            template: template.into(),
        }
    }

    pub fn apply(&self, raw: &str) -> String {
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(raw) else {
            return raw.to_string();
        };
        placeholder_pattern()
            .replace_all(&self.template, |caps: &Captures| match fields.get(&caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_string_fields() {
        let format = MessageFormat::new("{name}: {message}");
        let line = r#"{"name":"api","message":"request failed"}"#;
        assert_eq!(format.apply(line), "api: request failed");
    }

    #[test]
    fn test_non_json_line_passes_through() {
        let format = MessageFormat::new("{name}: {message}");
        assert_eq!(format.apply("plain text line"), "plain text line");
    }

    #[test]
    fn test_json_array_passes_through() {
        let format = MessageFormat::new("{name}");
        assert_eq!(format.apply(r#"[1,2,3]"#), "[1,2,3]");
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let format = MessageFormat::new("{name}: {missing}");
        assert_eq!(format.apply(r#"{"name":"api"}"#), "api: ");
    }

    #[test]
    fn test_non_string_field_renders_as_json() {
        let format = MessageFormat::new("status={status}");
        assert_eq!(format.apply(r#"{"status":500}"#), "status=500");
    }

    #[test]
    fn test_literal_text_is_preserved() {
        let format = MessageFormat::new("[{level}] msg");
        assert_eq!(format.apply(r#"{"level":"warn"}"#), "[warn] msg");
    }
}
