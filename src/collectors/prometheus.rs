//! Collectors from the `prometheus` crate.
//!
//! Wrap any `prometheus::core::Collector` (a `CounterVec`, a `Histogram`, a
//! custom collector) with [`PrometheusCollector::new`], or pass a whole
//! `prometheus::Registry`, which gathers every registered family.

use prometheus::core::Collector as PromCollector;
use prometheus::proto;

use crate::collect::{Collector, MetricHandle, MetricSink};
use crate::sample::{Label, Sample, Value};
use crate::{PromtestError, Result};

/// A single metric of a gathered family.
#[derive(Debug, Clone)]
pub struct PrometheusHandle {
    family: String,
    metric: proto::Metric,
}

impl PrometheusHandle {
    pub fn new(family: impl Into<String>, metric: proto::Metric) -> Self {
        Self {
            family: family.into(),
            metric,
        }
    }
}

impl MetricHandle for PrometheusHandle {
    fn write(&self) -> Result<Sample> {
        let m = &self.metric;

        let mut payloads = Vec::with_capacity(1);
        if m.has_counter() {
            payloads.push(Value::Counter {
                value: m.get_counter().get_value(),
            });
        }
        if m.has_gauge() {
            payloads.push(Value::Gauge {
                value: m.get_gauge().get_value(),
            });
        }
        if m.has_summary() {
            let s = m.get_summary();
            payloads.push(Value::Summary {
                sample_count: s.get_sample_count(),
                sample_sum: s.get_sample_sum(),
            });
        }
        if m.has_histogram() {
            let h = m.get_histogram();
            payloads.push(Value::Histogram {
                sample_count: h.get_sample_count(),
                sample_sum: h.get_sample_sum(),
            });
        }
        if m.has_untyped() {
            payloads.push(Value::Untyped {
                value: m.get_untyped().get_value(),
            });
        }

        let mut payloads = payloads.into_iter();
        let value = match (payloads.next(), payloads.next()) {
            (None, _) => Value::Empty,
            (Some(value), None) => value,
            (Some(_), Some(_)) => {
                return Err(PromtestError::ConflictingPayload {
                    name: self.family.clone(),
                });
            }
        };

        let labels = m
            .get_label()
            .iter()
            .map(|pair| Label {
                name: pair.has_name().then(|| pair.get_name().to_string()),
                value: pair.has_value().then(|| pair.get_value().to_string()),
            })
            .collect();

        Ok(Sample {
            name: self.family.clone(),
            labels,
            value,
        })
    }
}

fn push_families(families: Vec<proto::MetricFamily>, sink: &MetricSink<PrometheusHandle>) {
    for family in families {
        for metric in family.get_metric() {
            sink.push(PrometheusHandle::new(family.get_name(), metric.clone()));
        }
    }
}

/// Adapts a `prometheus` collector.
pub struct PrometheusCollector<'a, C: ?Sized>(&'a C);

impl<'a, C: PromCollector + ?Sized> PrometheusCollector<'a, C> {
    pub fn new(collector: &'a C) -> Self {
        Self(collector)
    }
}

impl<C: PromCollector + ?Sized> Collector for PrometheusCollector<'_, C> {
    type Handle = PrometheusHandle;

    fn collect(&self, sink: &MetricSink<PrometheusHandle>) {
        push_families(self.0.collect(), sink)
    }
}

impl Collector for prometheus::Registry {
    type Handle = PrometheusHandle;

    fn collect(&self, sink: &MetricSink<PrometheusHandle>) {
        push_families(self.gather(), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

    use crate::assertions::{assert_equals, assert_summary_sample_count};
    use crate::collect::collect;
    use crate::reporter::{CapturingReporter, Level};

    const NO_FILTER: &[&str] = &[];

    /// Replays hand-built metrics.
    struct Handles(Vec<PrometheusHandle>);

    impl Collector for Handles {
        type Handle = PrometheusHandle;

        fn collect(&self, sink: &MetricSink<PrometheusHandle>) {
            for handle in &self.0 {
                sink.push(handle.clone());
            }
        }
    }

    fn label(name: &str, value: &str) -> proto::LabelPair {
        let mut pair = proto::LabelPair::default();
        pair.set_name(name.to_string());
        pair.set_value(value.to_string());
        pair
    }

    fn write_summary(count: u64) -> PrometheusHandle {
        let mut summary = proto::Summary::default();
        summary.set_sample_count(count);
        summary.set_sample_sum(0.35);

        let mut metric = proto::Metric::default();
        metric.set_summary(summary);
        metric.mut_label().push(label("op", "write"));
        PrometheusHandle::new("store_op_seconds", metric)
    }

    #[test]
    fn decodes_counter_vec() {
        let requests =
            IntCounterVec::new(Opts::new("requests_total", "Requests served"), &["method"])
                .unwrap();
        requests.with_label_values(&["GET"]).inc_by(3);

        let t = CapturingReporter::new();
        let samples = collect(&t, &PrometheusCollector::new(&requests));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "requests_total");
        assert_eq!(samples[0].counter(), Some(3.0));
        assert_eq!(samples[0].label_value("method"), Some("GET"));
    }

    #[test]
    fn histogram_is_not_a_summary() {
        let latency = Histogram::with_opts(HistogramOpts::new("latency_seconds", "Latency"))
            .unwrap();
        latency.observe(0.2);

        let t = CapturingReporter::new();
        let samples = collect(&t, &PrometheusCollector::new(&latency));
        assert_eq!(samples.len(), 1);
        assert!(matches!(
            samples[0].value,
            Value::Histogram {
                sample_count: 1,
                ..
            }
        ));
    }

    #[test]
    fn label_pair_without_value() {
        let mut pair = proto::LabelPair::default();
        pair.set_name("method".to_string());

        let mut counter = proto::Counter::default();
        counter.set_value(1.0);

        let mut metric = proto::Metric::default();
        metric.set_counter(counter);
        metric.mut_label().push(pair);

        let sample = PrometheusHandle::new("x", metric).write().unwrap();
        assert_eq!(
            sample.labels,
            vec![Label {
                name: Some("method".into()),
                value: None
            }]
        );
    }

    #[test]
    fn two_payloads_fail_to_decode() {
        let mut metric = proto::Metric::default();
        metric.set_counter(proto::Counter::default());
        metric.set_gauge(proto::Gauge::default());

        assert_eq!(
            PrometheusHandle::new("confused", metric).write(),
            Err(PromtestError::ConflictingPayload {
                name: "confused".into()
            })
        );
    }

    #[test]
    fn registry_gathers_everything() {
        let registry = prometheus::Registry::new();
        let a = IntCounterVec::new(Opts::new("a_total", "a"), &["k"]).unwrap();
        let b = IntCounterVec::new(Opts::new("b_total", "b"), &["k"]).unwrap();
        registry.register(Box::new(a.clone())).unwrap();
        registry.register(Box::new(b.clone())).unwrap();
        a.with_label_values(&["1"]).inc();
        b.with_label_values(&["1"]).inc();
        b.with_label_values(&["2"]).inc();

        let t = CapturingReporter::new();
        assert_eq!(collect(&t, &registry).len(), 3);
    }

    #[test]
    fn summary_sample_count_from_proto() {
        let sample = write_summary(7).write().unwrap();
        assert_eq!(
            sample.value,
            Value::Summary {
                sample_count: 7,
                sample_sum: 0.35
            }
        );

        let t = CapturingReporter::new();
        let summaries = Handles(vec![write_summary(7)]);
        assert_summary_sample_count(&t, 7, &summaries, &["op=write"]);
        assert!(!t.failed(), "unexpected reports: {:?}", t.entries());

        assert_equals(&t, 7.0, &summaries, &["op=write"]);
        assert_eq!(
            t.messages(Level::Fatal),
            vec!["neither a counter nor a gauge".to_string()]
        );
    }

    #[test]
    fn untyped_is_neither_counter_nor_gauge() {
        let mut untyped = proto::Untyped::default();
        untyped.set_value(2.0);
        let mut metric = proto::Metric::default();
        metric.set_untyped(untyped);
        let handle = PrometheusHandle::new("legacy", metric);
        assert_eq!(handle.write().unwrap().value, Value::Untyped { value: 2.0 });

        let t = CapturingReporter::new();
        assert_equals(&t, 2.0, &Handles(vec![handle]), NO_FILTER);
        assert_eq!(
            t.messages(Level::Fatal),
            vec!["neither a counter nor a gauge".to_string()]
        );
        assert!(t.aborted());
    }

    #[test]
    fn no_payload_decodes_empty() {
        let handle = PrometheusHandle::new("bare", proto::Metric::default());
        assert_eq!(handle.write().unwrap().value, Value::Empty);

        let t = CapturingReporter::new();
        assert_equals(&t, 0.0, &Handles(vec![handle]), NO_FILTER);
        assert_eq!(
            t.messages(Level::Fatal),
            vec!["neither a counter nor a gauge".to_string()]
        );
        assert!(t.aborted());
        assert!(t.messages(Level::Error).is_empty());
    }
}
