use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collector::{CollectError, CollectionResult};
use crate::export::Translation;

/// Runtime counters of the exporter itself.
///
/// Purpose:
/// - Track how many passes ran
/// - Track collector outcomes (success / failure / timeout)
/// - Track how many samples made it out and how many were dropped
///
/// Design:
/// - Lock-free (Atomics)
/// - Cheap to update, safe to read from any task
/// - Cumulative since the exporter was built
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    pub passes: AtomicUsize,

    // Collectors
    pub collector_successes: AtomicUsize,
    pub collector_failures: AtomicUsize,
    pub collector_timeouts: AtomicUsize,

    // Samples
    pub samples_exported: AtomicUsize,
    pub samples_dropped: AtomicUsize,
}

impl RuntimeMetrics {
    pub fn record_pass(&self, result: &CollectionResult, translation: &Translation) {
        let timeouts = result
            .failures
            .iter()
            .filter(|(_, e)| matches!(e, CollectError::DeadlineExceeded(_)))
            .count();

        self.passes.fetch_add(1, Ordering::Relaxed);
        self.collector_successes
            .fetch_add(result.succeeded.len(), Ordering::Relaxed);
        self.collector_failures
            .fetch_add(result.failures.len(), Ordering::Relaxed);
        self.collector_timeouts.fetch_add(timeouts, Ordering::Relaxed);
        self.samples_exported
            .fetch_add(translation.samples.len(), Ordering::Relaxed);
        self.samples_dropped
            .fetch_add(translation.dropped, Ordering::Relaxed);
    }

    /// One-line, low-noise summary for the logs.
    pub fn summary(&self) -> String {
        format!(
            "[METRICS] passes={} ok={} failed={} timed_out={} samples={} dropped={}",
            self.passes.load(Ordering::Relaxed),
            self.collector_successes.load(Ordering::Relaxed),
            self.collector_failures.load(Ordering::Relaxed),
            self.collector_timeouts.load(Ordering::Relaxed),
            self.samples_exported.load(Ordering::Relaxed),
            self.samples_dropped.load(Ordering::Relaxed),
        )
    }
}
