//! OpenMetrics text encoding for a single scrape.
//!
//! A fresh registry is assembled for every scrape from that scrape's samples
//! and the shared telemetry handles, then encoded and dropped.

use prometheus_client::collector::Collector;
use prometheus_client::encoding::text::encode as encode_registry;
use prometheus_client::encoding::{
    DescriptorEncoder, EncodeLabelValue, EncodeMetric, LabelValueEncoder,
};
use prometheus_client::metrics::MetricType;
use prometheus_client::metrics::gauge::ConstGauge;
use prometheus_client::registry::Registry;
use std::fmt::Write;
use std::sync::Arc;

use crate::collector::{MetricDescriptor, MetricKind, MetricSample};
use crate::metrics::Telemetry;

/// Content type of the encoded body.
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// A label value escaped for the text format.
///
/// Event reasons are free-form. Backslash, double quote and newline are
/// written as `\\`, `\"` and `\n`.
struct EscapedLabelValue<'a>(&'a str);

impl EncodeLabelValue for EscapedLabelValue<'_> {
    fn encode(&self, encoder: &mut LabelValueEncoder) -> Result<(), std::fmt::Error> {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['\\', '"', '\n']) {
            encoder.write_str(&rest[..pos])?;
            let escaped = match rest.as_bytes()[pos] {
                b'\\' => "\\\\",
                b'"' => "\\\"",
                _ => "\\n",
            };
            encoder.write_str(escaped)?;
            rest = &rest[pos + 1..];
        }
        encoder.write_str(rest)
    }
}

/// One scrape's samples, registered as a collector for encoding.
#[derive(Debug)]
struct ScrapeSamples {
    descriptor: Arc<MetricDescriptor>,
    samples: Vec<MetricSample>,
}

impl Collector for ScrapeSamples {
    fn encode(&self, mut encoder: DescriptorEncoder) -> Result<(), std::fmt::Error> {
        let metric_type = match self.descriptor.kind {
            MetricKind::Gauge => MetricType::Gauge,
        };
        let mut metric_encoder = encoder.encode_descriptor(
            self.descriptor.name,
            self.descriptor.help,
            None,
            metric_type,
        )?;

        for sample in &self.samples {
            let labels = sample
                .label_pairs()
                .map(|(name, value)| (name, EscapedLabelValue(value)));
            let sample_encoder = metric_encoder.encode_family(&labels)?;
            ConstGauge::new(sample.value).encode(sample_encoder)?;
        }
        Ok(())
    }
}

/// Encode a scrape's samples followed by the exporter's own telemetry.
///
/// Samples are sorted by label values before encoding. Consumers must not
/// rely on the emitted order.
pub fn encode(
    descriptor: &Arc<MetricDescriptor>,
    mut samples: Vec<MetricSample>,
    telemetry: &Telemetry,
) -> Result<String, std::fmt::Error> {
    samples.sort_by(|a, b| a.label_pairs().cmp(&b.label_pairs()));

    let mut registry = Registry::default();
    registry.register_collector(Box::new(ScrapeSamples {
        descriptor: Arc::clone(descriptor),
        samples,
    }));
    telemetry.register(&mut registry);

    let mut body = String::new();
    encode_registry(&mut body, &registry)?;
    Ok(body)
}
