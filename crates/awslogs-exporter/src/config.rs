// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:9223";
const DEFAULT_METRICS_PATH: &str = "/metrics";
const DEFAULT_LOG_HISTORY_SECS: i64 = 3600;
const DEFAULT_MAX_IN_FLIGHT: usize = 16;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading or validating the exporter configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Exporter configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub listen_address: String,
    /// Path where metrics are exposed.
    pub metrics_path: String,
    /// AWS region to scrape. Required, no default.
    pub aws_region: String,
    /// Name prefix used to filter log groups during listing.
    pub group_prefix: Option<String>,
    /// Seconds of previous log events to search.
    pub log_history_secs: i64,
    /// Optional template to render JSON log lines through
    /// (e.g. `{name}: {message}`).
    pub log_json_format: Option<String>,
    /// Ceiling on concurrent per-group fetches.
    pub max_in_flight: usize,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_address = env::var("AWSLOGS_LISTEN_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDRESS.to_string());
        let metrics_path =
            env::var("AWSLOGS_METRICS_PATH").unwrap_or_else(|_| DEFAULT_METRICS_PATH.to_string());
        let aws_region = env::var("AWSLOGS_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .unwrap_or_default();
        let group_prefix = env::var("AWSLOGS_GROUP_PREFIX")
            .ok()
            .filter(|prefix| !prefix.is_empty());
        let log_history_secs = env::var("AWSLOGS_LOG_HISTORY")
            .ok()
            .and_then(|val| val.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LOG_HISTORY_SECS);
        let log_json_format = env::var("AWSLOGS_LOG_JSON_FORMAT")
            .ok()
            .filter(|format| !format.is_empty());
        let max_in_flight = env::var("AWSLOGS_MAX_IN_FLIGHT")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT);
        let debug = env::var("AWSLOGS_DEBUG")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(false);
        let log_level = if debug {
            "debug".to_string()
        } else {
            env::var("AWSLOGS_LOG_LEVEL")
                .map(|val| val.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
        };

        let config = Self {
            listen_address,
            metrics_path,
            aws_region,
            group_prefix,
            log_history_secs,
            log_json_format,
            max_in_flight,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aws_region.trim().is_empty() {
            return Err(ConfigError::Invalid("An AWS region is required".to_string()));
        }

        if !self.metrics_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if self.log_history_secs <= 0 {
            return Err(ConfigError::Invalid(
                "Log history must be greater than 0 seconds".to_string(),
            ));
        }

        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid(
                "Max in-flight fetches must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}
