//! Metrics infrastructure for zwctl command-class handlers.
//!
//! This crate defines every metric emitted by the handlers as a structured
//! [`Metric`] constant, plus the label helper used to scope them to a
//! (node, endpoint, handler) binding. It re-exports the `metrics` crate so
//! handlers and hosts agree on one facade version.
//!
//! # Example
//!
//! ```rust,ignore
//! use zwctl_metrics::{HandlerLabels, metric_defs, describe_metrics};
//!
//! // Initialize metrics descriptions at startup
//! describe_metrics();
//!
//! let labels = HandlerLabels::new(5, 0, "scene_actuator_conf");
//! metrics::counter!(metric_defs::REQUESTS_BUILT.name, &labels.to_labels()).increment(1);
//! ```
//!
//! # Metric Type
//!
//! ```rust
//! use zwctl_metrics::{Metric, MetricKind};
//! use metrics::Unit;
//!
//! const MY_COUNTER: Metric = Metric::counter("my.counter")
//!     .with_description("A counter metric")
//!     .with_unit(Unit::Count)
//!     .with_labels(&["node", "handler"]);
//!
//! assert_eq!(MY_COUNTER.kind, MetricKind::Counter);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_histogram, Unit};

/// How a metric is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic count of events.
    Counter,
    /// Distribution of observed values.
    Histogram,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        })
    }
}

/// Compile-time declaration of one handler metric.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Metric key, e.g. `zwctl.handler.responses`.
    pub name: &'static str,
    /// Counter or histogram.
    pub kind: MetricKind,
    /// Description registered with the recorder.
    pub description: &'static str,
    /// Unit, if any.
    pub unit: Option<Unit>,
    /// Label keys every emission carries.
    pub labels: &'static [&'static str],
}

impl Metric {
    const fn new(name: &'static str, kind: MetricKind) -> Self {
        Metric {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Declare a counter.
    pub const fn counter(name: &'static str) -> Self {
        Self::new(name, MetricKind::Counter)
    }

    /// Declare a histogram.
    pub const fn histogram(name: &'static str) -> Self {
        Self::new(name, MetricKind::Histogram)
    }

    /// Set the description.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set the unit.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the label keys.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Register the description with the installed recorder.
    pub fn describe(&self) {
        let unit = self.unit.unwrap_or(Unit::Count);
        match self.kind {
            MetricKind::Counter => describe_counter!(self.name, unit, self.description),
            MetricKind::Histogram => describe_histogram!(self.name, unit, self.description),
        }
    }
}

/// All metric definitions for the handlers.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Standard labels present on all handler-scoped metrics.
    pub const STANDARD_LABELS: &[&str] = &["node", "endpoint", "handler"];

    /// Request envelopes built.
    ///
    /// Labels: node, endpoint, handler, subcommand
    pub const REQUESTS_BUILT: Metric = Metric::counter("zwctl.handler.requests_built")
        .with_description("Request envelopes built by a handler")
        .with_unit(Unit::Count)
        .with_labels(&["node", "endpoint", "handler", "subcommand"]);

    /// Responses consumed, by dispatch outcome.
    ///
    /// Labels: node, endpoint, handler, outcome
    ///
    /// `outcome` is one of `decoded`, `unknown_subcommand`, `malformed`.
    /// Every response is counted; none is ever rejected.
    pub const RESPONSES: Metric = Metric::counter("zwctl.handler.responses")
        .with_description("Responses consumed by a handler")
        .with_unit(Unit::Count)
        .with_labels(&["node", "endpoint", "handler", "outcome"]);

    /// Responses whose subcommand tag the handler does not know.
    ///
    /// Labels: node, endpoint, handler, tag
    pub const UNKNOWN_SUBCOMMANDS: Metric = Metric::counter("zwctl.handler.unknown_subcommands")
        .with_description("Responses carrying an unknown subcommand tag")
        .with_unit(Unit::Count)
        .with_labels(&["node", "endpoint", "handler", "tag"]);

    /// Responses too short for the fields their subcommand declares.
    ///
    /// Labels: node, endpoint, handler
    pub const DECODE_FAILURES: Metric = Metric::counter("zwctl.handler.decode_failures")
        .with_description("Responses that failed field decoding")
        .with_unit(Unit::Count)
        .with_labels(&["node", "endpoint", "handler"]);

    /// Response payload size in bytes.
    ///
    /// Labels: node, endpoint, handler
    pub const RESPONSE_SIZE: Metric = Metric::histogram("zwctl.handler.response_size_bytes")
        .with_description("Response payload size in bytes")
        .with_unit(Unit::Bytes)
        .with_labels(&["node", "endpoint", "handler"]);

    /// Every metric, for bulk registration.
    pub const ALL: &[&Metric] = &[
        &REQUESTS_BUILT,
        &RESPONSES,
        &UNKNOWN_SUBCOMMANDS,
        &DECODE_FAILURES,
        &RESPONSE_SIZE,
    ];
}

/// Labels identifying one handler binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerLabels {
    /// Node id.
    pub node: String,
    /// Endpoint id.
    pub endpoint: String,
    /// Handler name (e.g. `setup_api`).
    pub handler: String,
}

impl HandlerLabels {
    /// Creates labels for a handler bound to `node`/`endpoint`.
    pub fn new(node: u8, endpoint: u8, handler: impl Into<String>) -> Self {
        Self {
            node: node.to_string(),
            endpoint: endpoint.to_string(),
            handler: handler.into(),
        }
    }

    /// Converts the labels to the metrics crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![
            ("node", self.node.clone()),
            ("endpoint", self.endpoint.clone()),
            ("handler", self.handler.clone()),
        ]
    }

    /// Returns labels with additional key-value pairs.
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Describes all handler metrics.
///
/// Call once at startup, after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_labels() {
        let labels = HandlerLabels::new(5, 0, "setup_api");
        let label_vec = labels.to_labels();

        assert_eq!(label_vec.len(), 3);
        assert!(label_vec.contains(&("node", "5".to_string())));
        assert!(label_vec.contains(&("endpoint", "0".to_string())));
        assert!(label_vec.contains(&("handler", "setup_api".to_string())));
    }

    #[test]
    fn test_with_extra_labels() {
        let labels = HandlerLabels::new(1, 2, "scene_actuator_conf");
        let extended = labels.with(&[("outcome", "decoded".to_string())]);

        assert_eq!(extended.len(), 4);
        assert!(extended.contains(&("outcome", "decoded".to_string())));
    }

    #[test]
    fn test_metric_definitions() {
        assert_eq!(metric_defs::RESPONSES.name, "zwctl.handler.responses");
        assert_eq!(metric_defs::RESPONSES.kind, MetricKind::Counter);
        assert_eq!(metric_defs::RESPONSE_SIZE.kind, MetricKind::Histogram);
        assert_eq!(metric_defs::RESPONSE_SIZE.unit, Some(Unit::Bytes));
        assert!(metric_defs::UNKNOWN_SUBCOMMANDS.labels.contains(&"tag"));
    }

    #[test]
    fn test_all_metrics_count() {
        assert_eq!(metric_defs::ALL.len(), 5);
    }

    #[test]
    fn test_standard_labels_prefix_every_metric() {
        for metric in metric_defs::ALL {
            assert_eq!(&metric.labels[..3], metric_defs::STANDARD_LABELS, "{}", metric.name);
        }
    }

    #[test]
    fn test_metric_minimal() {
        const MINIMAL: Metric = Metric::counter("minimal");

        assert_eq!(MINIMAL.kind, MetricKind::Counter);
        assert_eq!(MINIMAL.description, "");
        assert_eq!(MINIMAL.unit, None);
        assert!(MINIMAL.labels.is_empty());
        assert_eq!(MetricKind::Histogram.to_string(), "histogram");
    }
}
