// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Prometheus text exposition for one scrape.
//!
//! A fresh sink is built per scrape from the exporter's descriptor table, so
//! the rendered output is a point-in-time snapshot of exactly one cycle.

use std::collections::HashMap;

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::emitter::MetricSink;
use crate::error::EmitError;
use crate::schema::{MetricDescriptor, Sample};

/// Content type of the rendered exposition body.
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// A metric sink backed by a private Prometheus registry.
pub struct PrometheusSink {
    registry: Registry,
    gauges: HashMap<&'static str, GaugeVec>,
}

impl PrometheusSink {
    /// Builds one gauge family per descriptor in a fresh registry.
    pub fn new(descriptors: &[MetricDescriptor]) -> Result<Self, EmitError> {
        let registry = Registry::new();
        let mut gauges = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let gauge = GaugeVec::new(
                Opts::new(descriptor.name, descriptor.help),
                descriptor.labels,
            )
            .map_err(|e| EmitError::Sink(e.to_string()))?;
            registry
                .register(Box::new(gauge.clone()))
                .map_err(|e| EmitError::Sink(e.to_string()))?;
            gauges.insert(descriptor.name, gauge);
        }
        Ok(PrometheusSink { registry, gauges })
    }

    /// Encodes everything recorded so far in the Prometheus text format.
    pub fn render(&self) -> Result<String, EmitError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| EmitError::Sink(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| EmitError::Sink(e.to_string()))
    }
}

impl MetricSink for PrometheusSink {
    fn record(&self, sample: Sample) -> Result<(), EmitError> {
        let gauge = self
            .gauges
            .get(sample.name)
            .ok_or_else(|| EmitError::Sink(format!("unknown metric {}", sample.name)))?;
        let label_values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
        gauge
            .get_metric_with_label_values(&label_values)
            .map_err(|e| EmitError::Sink(e.to_string()))?
            .set(sample.value);
        Ok(())
    }
}
