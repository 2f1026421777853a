use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide store of labelled counters and gauges.
///
/// Labels are passed as `(key, value)` pairs in the order the metric was
/// declared with. Using a different key set for an existing metric is a
/// programming error and panics.
pub trait MetricsPort: Send + Sync {
    /// Declares kind, help text and label keys ahead of the first sample.
    fn describe(&self, name: &str, kind: MetricKind, help: &str, label_keys: &[&str]);

    fn counter_add(&self, name: &str, labels: &[(&str, &str)], delta: u64);

    fn counter_inc(&self, name: &str, labels: &[(&str, &str)]) {
        self.counter_add(name, labels, 1);
    }

    fn gauge_set(&self, name: &str, labels: &[(&str, &str)], value: f64);

    fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64>;

    fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64>;

    /// Renders every metric with at least one sample in the text exposition format.
    fn snapshot(&self) -> Vec<u8>;
}
