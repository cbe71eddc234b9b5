//! [`Collector`](crate::Collector) bindings for metrics libraries.
//!
//! - [`snapshot`]: the `metrics` ecosystem's debugging recorder (always on).
//! - [`prometheus`]: `prometheus` crate collectors and registries
//!   (requires the `prometheus` feature).

#[cfg(feature = "prometheus")]
pub mod prometheus;
pub mod snapshot;

#[cfg(feature = "prometheus")]
pub use self::prometheus::{PrometheusCollector, PrometheusHandle};
pub use snapshot::{MetricView, SnapshotCollector, SnapshotEntry};
