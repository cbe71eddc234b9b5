//! Draining collectors into samples.
//!
//! A [`Collector`] pushes opaque handles into a [`MetricSink`]. The sink wraps
//! an unbounded `tokio::sync::mpsc` channel, so pushing never blocks and works
//! from inside or outside a runtime. One scoped worker thread decodes handles
//! as they arrive; [`collect`] closes the channel once the collector returns
//! and joins the worker before handing back the samples.

use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

use crate::reporter::Reporter;
use crate::sample::Sample;
use crate::{PromtestError, Result};

/// A single observation that can be decoded into a [`Sample`].
pub trait MetricHandle {
    fn write(&self) -> Result<Sample>;
}

/// Already-decoded samples pass through unchanged.
impl MetricHandle for Sample {
    fn write(&self) -> Result<Sample> {
        Ok(self.clone())
    }
}

/// Something that can report its current observations.
pub trait Collector {
    type Handle: MetricHandle + Send + 'static;

    /// Push a handle for every current observation into `sink`.
    fn collect(&self, sink: &MetricSink<Self::Handle>);
}

impl<C: Collector + ?Sized> Collector for &C {
    type Handle = C::Handle;

    fn collect(&self, sink: &MetricSink<Self::Handle>) {
        (**self).collect(sink)
    }
}

/// Receiving end a collector pushes handles into.
#[derive(Debug)]
pub struct MetricSink<H> {
    tx: mpsc::UnboundedSender<H>,
}

impl<H> MetricSink<H> {
    /// Hand one observation to the decoder.
    pub fn push(&self, handle: H) {
        // The worker only stops receiving after the sink is dropped.
        let _ = self.tx.send(handle);
    }
}

/// Collect every observation of `collector` as a flat list of samples.
///
/// Samples come back in push order. Handles that fail to decode are reported
/// as errors and skipped.
pub fn collect<R, C>(t: &R, collector: &C) -> Vec<Sample>
where
    R: Reporter + ?Sized,
    C: Collector + ?Sized,
{
    t.helper();
    let (tx, mut rx) = mpsc::unbounded_channel::<C::Handle>();
    let sink = MetricSink { tx };

    let decoded = thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let mut decoded = Vec::new();
            while let Some(handle) = rx.blocking_recv() {
                decoded.push(handle.write());
            }
            decoded
        });

        collector.collect(&sink);
        drop(sink);

        worker.join().map_err(|_| PromtestError::WorkerPanicked)
    });

    let decoded = match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            t.error(format_args!("Failed to collect metrics: {e}"));
            return Vec::new();
        }
    };

    let pushed = decoded.len();
    let samples: Vec<Sample> = decoded
        .into_iter()
        .filter_map(|result| report_decode(t, result))
        .collect();
    debug!(pushed, decoded = samples.len(), "collected metrics");
    samples
}

/// Decode a single handle, reporting a failure as an error.
pub fn collect_metric<R, H>(t: &R, handle: &H) -> Option<Sample>
where
    R: Reporter + ?Sized,
    H: MetricHandle + ?Sized,
{
    t.helper();
    report_decode(t, handle.write())
}

fn report_decode<R: Reporter + ?Sized>(t: &R, result: Result<Sample>) -> Option<Sample> {
    match result {
        Ok(sample) => Some(sample),
        Err(e) => {
            debug!(error = %e, "skipping undecodable metric");
            t.error(format_args!("Failed to collect metric: {e}"));
            None
        }
    }
}
