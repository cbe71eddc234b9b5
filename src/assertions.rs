//! Assertions over collected samples.
//!
//! ```rust
//! use metrics_util::debugging::DebuggingRecorder;
//! use promtest::{SnapshotCollector, StdReporter};
//!
//! let recorder = DebuggingRecorder::new();
//! let snapshotter = recorder.snapshotter();
//! metrics::with_local_recorder(&recorder, || {
//!     metrics::counter!("requests_total", "method" => "GET").increment(3);
//!     metrics::counter!("requests_total", "method" => "POST").increment(2);
//! });
//!
//! let snapshot = SnapshotCollector::take(&snapshotter);
//! let t = StdReporter::new();
//! let requests = snapshot.metric("requests_total");
//! promtest::assert_equals(&t, 3.0, &requests, &["method=GET"]);
//! promtest::assert_equals(&t, 5.0, &requests, &[] as &[&str]);
//! ```

use crate::collect::{Collector, collect};
use crate::filter::{describe, matches};
use crate::reporter::Reporter;
use crate::sample::{Sample, Value};

/// First sample of `collector` whose labels satisfy `filter`.
///
/// Meant for filters that identify exactly one sample. To assert on the
/// value across several label combinations use [`assert_equals`].
#[track_caller]
pub fn get_metric<R, C, S>(t: &R, collector: &C, filter: &[S]) -> Option<Sample>
where
    R: Reporter + ?Sized,
    C: Collector + ?Sized,
    S: AsRef<str>,
{
    t.helper();
    collect(t, collector)
        .into_iter()
        .find(|sample| matches(t, sample, filter))
}

fn filtered<R, C, S>(t: &R, collector: &C, filter: &[S]) -> Vec<Sample>
where
    R: Reporter + ?Sized,
    C: Collector + ?Sized,
    S: AsRef<str>,
{
    collect(t, collector)
        .into_iter()
        .filter(|sample| matches(t, sample, filter))
        .collect()
}

/// Assert that the counters or gauges matching `filter` sum to `expected`.
///
/// Values from every matching label combination are added up. Comparison is
/// exact. A matching sample that is neither a counter nor a gauge aborts the
/// assertion through [`Reporter::fatal`].
#[track_caller]
pub fn assert_equals<R, C, S>(t: &R, expected: f64, collector: &C, filter: &[S])
where
    R: Reporter + ?Sized,
    C: Collector + ?Sized,
    S: AsRef<str>,
{
    t.helper();
    let mut actual = 0.0;
    for sample in filtered(t, collector, filter) {
        match sample.value {
            Value::Counter { value } | Value::Gauge { value } => actual += value,
            _ => {
                t.fatal(format_args!("neither a counter nor a gauge"));
                return;
            }
        }
    }

    if actual != expected {
        t.error(format_args!(
            "Expected metric with labels={} to have a value of {expected} but we got {actual}",
            describe(filter)
        ));
    }
}

/// Assert that the summaries matching `filter` observed `expected` samples
/// in total.
///
/// A matching sample that is not a summary aborts the assertion through
/// [`Reporter::fatal`].
#[track_caller]
pub fn assert_summary_sample_count<R, C, S>(t: &R, expected: u64, collector: &C, filter: &[S])
where
    R: Reporter + ?Sized,
    C: Collector + ?Sized,
    S: AsRef<str>,
{
    t.helper();
    let mut actual: u64 = 0;
    for sample in filtered(t, collector, filter) {
        let Some(count) = sample.summary_sample_count() else {
            t.fatal(format_args!("metric is not a summary"));
            return;
        };
        actual = actual.saturating_add(count);
    }

    if actual != expected {
        t.error(format_args!(
            "Expected metric with labels={} to have a sample count of {expected} but we got {actual}",
            describe(filter)
        ));
    }
}
