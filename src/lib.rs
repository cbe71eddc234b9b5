//! promtest - assertions on metric collectors
//!
//! Pulls the current observations out of a metric collector, filters them by
//! `name=value` label pairs and compares the result against an expectation.
//! Failures go through a [`Reporter`], so the helpers work with any harness.
//!
//! # Example
//!
//! ```rust
//! use metrics_util::debugging::DebuggingRecorder;
//! use promtest::{SnapshotCollector, StdReporter};
//!
//! let recorder = DebuggingRecorder::new();
//! let snapshotter = recorder.snapshotter();
//! metrics::with_local_recorder(&recorder, || {
//!     metrics::counter!("http_requests_total", "code" => "200").increment(3);
//!     metrics::histogram!("db_write_seconds", "op" => "write").record(0.02);
//! });
//!
//! let snapshot = SnapshotCollector::take(&snapshotter);
//! let t = StdReporter::new();
//! let requests = snapshot.metric("http_requests_total");
//! promtest::assert_equals(&t, 3.0, &requests, &["code=200"]);
//!
//! let m = promtest::get_metric(&t, &requests, &["code=200"]).unwrap();
//! assert_eq!(m.counter(), Some(3.0));
//!
//! let writes = snapshot.metric("db_write_seconds");
//! promtest::assert_summary_sample_count(&t, 1, &writes, &["op=write"]);
//! ```
//!
//! # Features
//!
//! - `prometheus`: [`Collector`] bindings for `prometheus` crate collectors
//!   and registries.

pub mod assertions;
pub mod collect;
pub mod collectors;
pub mod error;
pub mod filter;
pub mod reporter;
pub mod sample;

// Re-export main types at crate root
pub use assertions::{assert_equals, assert_summary_sample_count, get_metric};
pub use collect::{Collector, MetricHandle, MetricSink, collect, collect_metric};
#[cfg(feature = "prometheus")]
pub use collectors::{PrometheusCollector, PrometheusHandle};
pub use collectors::{MetricView, SnapshotCollector, SnapshotEntry};
pub use error::{PromtestError, Result};
pub use filter::{LabelFilter, matches};
pub use reporter::{CapturingReporter, Reporter, StdReporter};
pub use sample::{Label, Sample, Value};
