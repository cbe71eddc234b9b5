//! Collector over a `metrics_util::debugging` snapshot.
//!
//! Install a [`DebuggingRecorder`](metrics_util::debugging::DebuggingRecorder)
//! (globally or with `metrics::with_local_recorder`), run the code under
//! test, then take one snapshot with [`SnapshotCollector::take`] and assert
//! against it as often as needed.
//!
//! `Snapshotter::snapshot` resets every counter, gauge and histogram in the
//! recorder, for all metric names. The collector therefore reads the recorder
//! once and replays the stored entries on every `collect`. Metrics recorded
//! after the snapshot need a new one.
//!
//! Counters decode to counter samples and gauges to gauge samples.
//! Histograms decode to summaries: the sample count is the number of recorded
//! values and the sum is their total, which is how the `metrics` Prometheus
//! exporter renders histograms without configured buckets.

use metrics_util::debugging::{DebugValue, Snapshot, Snapshotter};
use metrics_util::{CompositeKey, MetricKind};

use crate::collect::{Collector, MetricHandle, MetricSink};
use crate::sample::{Label, Sample, Value};
use crate::{PromtestError, Result};

/// Value held by a snapshot entry.
#[derive(Debug, Clone, PartialEq)]
enum Recorded {
    Counter(u64),
    Gauge(f64),
    Histogram(Vec<f64>),
}

impl From<DebugValue> for Recorded {
    fn from(value: DebugValue) -> Self {
        match value {
            DebugValue::Counter(v) => Recorded::Counter(v),
            DebugValue::Gauge(v) => Recorded::Gauge(v.0),
            DebugValue::Histogram(values) => {
                Recorded::Histogram(values.into_iter().map(|v| v.0).collect())
            }
        }
    }
}

impl Recorded {
    fn kind(&self) -> &'static str {
        match self {
            Recorded::Counter(_) => "counter",
            Recorded::Gauge(_) => "gauge",
            Recorded::Histogram(_) => "histogram",
        }
    }
}

/// One snapshot entry, decoded lazily.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    key: CompositeKey,
    value: Recorded,
}

impl SnapshotEntry {
    pub fn new(key: CompositeKey, value: DebugValue) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.key.key().name()
    }
}

impl MetricHandle for SnapshotEntry {
    fn write(&self) -> Result<Sample> {
        let value = match (self.key.kind(), &self.value) {
            (MetricKind::Counter, Recorded::Counter(v)) => Value::Counter { value: *v as f64 },
            (MetricKind::Gauge, Recorded::Gauge(v)) => Value::Gauge { value: *v },
            (MetricKind::Histogram, Recorded::Histogram(values)) => Value::Summary {
                sample_count: values.len() as u64,
                sample_sum: values.iter().sum(),
            },
            (kind, value) => {
                return Err(PromtestError::KindMismatch {
                    name: self.name().to_string(),
                    expected: kind_name(kind),
                    actual: value.kind(),
                });
            }
        };

        let labels = self
            .key
            .key()
            .labels()
            .map(|l| Label::new(l.key(), l.value()))
            .collect();

        Ok(Sample {
            name: self.name().to_string(),
            labels,
            value,
        })
    }
}

fn kind_name(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::Counter => "counter",
        MetricKind::Gauge => "gauge",
        MetricKind::Histogram => "histogram",
    }
}

/// A stored snapshot, replayed on every `collect`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCollector {
    entries: Vec<SnapshotEntry>,
}

impl SnapshotCollector {
    pub fn new(snapshot: Snapshot) -> Self {
        let entries = snapshot
            .into_vec()
            .into_iter()
            .map(|(key, _unit, _description, value)| SnapshotEntry::new(key, value))
            .collect();
        Self { entries }
    }

    /// Snapshot the recorder now. This resets the recorder's metrics.
    pub fn take(snapshotter: &Snapshotter) -> Self {
        Self::new(snapshotter.snapshot())
    }

    /// Only the metric called `name`, across all its label combinations.
    pub fn metric<'a>(&'a self, name: &'a str) -> MetricView<'a> {
        MetricView {
            entries: &self.entries,
            name,
        }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }
}

impl From<Snapshot> for SnapshotCollector {
    fn from(snapshot: Snapshot) -> Self {
        Self::new(snapshot)
    }
}

impl Collector for SnapshotCollector {
    type Handle = SnapshotEntry;

    fn collect(&self, sink: &MetricSink<SnapshotEntry>) {
        for entry in &self.entries {
            sink.push(entry.clone());
        }
    }
}

/// A [`SnapshotCollector`] scoped to one metric name.
#[derive(Debug, Clone, Copy)]
pub struct MetricView<'a> {
    entries: &'a [SnapshotEntry],
    name: &'a str,
}

impl Collector for MetricView<'_> {
    type Handle = SnapshotEntry;

    fn collect(&self, sink: &MetricSink<SnapshotEntry>) {
        for entry in self.entries.iter().filter(|e| e.name() == self.name) {
            sink.push(entry.clone());
        }
    }
}
