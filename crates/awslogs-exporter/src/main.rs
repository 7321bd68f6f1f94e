// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use awslogs_collector::aws::AwsLogsGatherer;
use awslogs_collector::exporter::{Exporter, ExporterConfig, DEFAULT_FETCH_TIMEOUT};
use awslogs_collector::format::MessageFormat;
use awslogs_collector::server::MetricsServer;

use crate::config::Config;

#[tokio::main]
pub async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return;
        }
    };

    let env_filter = format!("hyper=off,aws_config=off,aws_smithy_runtime=off,{}", config.log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting AWS Logs exporter");
    if let Some(ref prefix) = config.group_prefix {
        info!("Filtering log groups by prefix: {prefix}");
    }

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;
    let client = aws_sdk_cloudwatchlogs::Client::new(&sdk_config);
    let gatherer = Arc::new(AwsLogsGatherer::new(
        client,
        config.group_prefix.clone(),
        config.log_history_secs,
    ));

    let exporter = Arc::new(Exporter::new(
        gatherer,
        ExporterConfig {
            region: config.aws_region.clone(),
            message_format: config.log_json_format.as_deref().map(MessageFormat::new),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_in_flight: config.max_in_flight,
        },
    ));

    let server = MetricsServer::new(
        config.listen_address.clone(),
        config.metrics_path.clone(),
        exporter,
    );
    if let Err(e) = server.run().await {
        error!("Error running metrics server: {e}");
    }
}
