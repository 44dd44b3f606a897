//! Metrics infrastructure for the mailbox notifier.
//!
//! Every metric the pipeline records is declared here as a [`Metric`]
//! constant, so names are spelled once and carry their description and
//! unit. The `metrics` facade is re-exported; until a recorder is
//! installed all recording calls are no-ops.
//!
//! # Example
//!
//! ```rust,ignore
//! use mailbox_metrics::{describe_metrics, metric_defs};
//!
//! describe_metrics();
//! metrics::counter!(metric_defs::FRAMES_DECODED.name).increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use mailbox_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const LINES: Metric = Metric::counter("mailbox.lines.received")
///     .with_description("Lines read from the gateway")
///     .with_unit(Unit::Count);
///
/// assert_eq!(LINES.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name.
    pub name: &'static str,
    /// The kind of metric.
    pub kind: MetricKind,
    /// Human-readable description of the metric.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys for this metric.
    pub labels: &'static [&'static str],
}

impl Metric {
    const fn new(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self::new(name, MetricKind::Counter)
    }

    /// Creates a new gauge metric with the given name.
    pub const fn gauge(name: &'static str) -> Self {
        Self::new(name, MetricKind::Gauge)
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self::new(name, MetricKind::Histogram)
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys for the metric.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the metrics recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions for the notifier.
pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Line Intake
    // ========================================================================

    /// Lines handed to the decoder.
    pub const LINES_RECEIVED: Metric = Metric::counter("mailbox.lines.received")
        .with_description("Lines read from the gateway")
        .with_unit(Unit::Count);

    /// Lines decoded into a frame.
    pub const FRAMES_DECODED: Metric = Metric::counter("mailbox.frames.decoded")
        .with_description("Lines decoded into a sensor frame")
        .with_unit(Unit::Count);

    /// Label key of [`FRAMES_REJECTED`].
    pub const REASON_LABEL: &str = "reason";

    /// Lines rejected by the decoder.
    ///
    /// Labels: reason (missing_prefix, malformed, truncated_entry)
    pub const FRAMES_REJECTED: Metric = Metric::counter("mailbox.frames.rejected")
        .with_description("Lines the decoder rejected")
        .with_unit(Unit::Count)
        .with_labels(&[REASON_LABEL]);

    /// Frames whose LRC did not check out.
    pub const CHECKSUM_MISMATCH: Metric = Metric::counter("mailbox.frames.checksum_mismatch")
        .with_description("Decoded frames with a failing LRC")
        .with_unit(Unit::Count);

    // ========================================================================
    // Status
    // ========================================================================

    /// Committed status changes.
    pub const STATUS_TRANSITIONS: Metric = Metric::counter("mailbox.status.transitions")
        .with_description("Magnetic status changes")
        .with_unit(Unit::Count);

    /// Last observed magnetic status.
    pub const STATUS_CURRENT: Metric = Metric::gauge("mailbox.status.current")
        .with_description("Current magnetic status (0-15)");

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Notifications delivered.
    pub const NOTIFY_SENT: Metric = Metric::counter("mailbox.notify.sent")
        .with_description("Notifications accepted by the notifier")
        .with_unit(Unit::Count);

    /// Notifications that failed.
    pub const NOTIFY_FAILED: Metric = Metric::counter("mailbox.notify.failed")
        .with_description("Notifications the notifier reported as failed")
        .with_unit(Unit::Count);

    /// Time spent inside the notifier.
    pub const NOTIFY_LATENCY: Metric = Metric::histogram("mailbox.notify.latency_ms")
        .with_description("Notifier call duration in milliseconds")
        .with_unit(Unit::Milliseconds);

    /// Every metric, for registration.
    pub const ALL: &[&Metric] = &[
        &LINES_RECEIVED,
        &FRAMES_DECODED,
        &FRAMES_REJECTED,
        &CHECKSUM_MISMATCH,
        &STATUS_TRANSITIONS,
        &STATUS_CURRENT,
        &NOTIFY_SENT,
        &NOTIFY_FAILED,
        &NOTIFY_LATENCY,
    ];
}

/// Describes all metrics used by the notifier.
///
/// Call once at startup, after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

/// Install a Prometheus recorder serving `/metrics` on `addr`.
#[cfg(feature = "prometheus")]
pub fn install_prometheus(
    addr: std::net::SocketAddr,
) -> Result<(), metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    describe_metrics();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_definitions() {
        assert_eq!(metric_defs::FRAMES_DECODED.name, "mailbox.frames.decoded");
        assert_eq!(metric_defs::FRAMES_DECODED.kind, MetricKind::Counter);
        assert_eq!(metric_defs::FRAMES_REJECTED.labels, &["reason"]);
        assert_eq!(metric_defs::STATUS_CURRENT.kind, MetricKind::Gauge);
        assert_eq!(metric_defs::STATUS_CURRENT.unit, None);
        assert_eq!(metric_defs::NOTIFY_LATENCY.kind, MetricKind::Histogram);
        assert_eq!(metric_defs::NOTIFY_LATENCY.unit, Some(Unit::Milliseconds));
    }

    #[test]
    fn test_all_metrics_unique() {
        let mut names: Vec<_> = metric_defs::ALL.iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), metric_defs::ALL.len());
        assert_eq!(metric_defs::ALL.len(), 9);
    }

    #[test]
    fn test_describe_without_recorder() {
        // no recorder installed: describing must be a harmless no-op
        describe_metrics();
    }

    #[test]
    fn test_labeled_metrics() {
        let labeled: Vec<_> = metric_defs::ALL
            .iter()
            .filter(|m| !m.labels.is_empty())
            .map(|m| m.name)
            .collect();
        assert_eq!(labeled, vec!["mailbox.frames.rejected"]);
    }
}
