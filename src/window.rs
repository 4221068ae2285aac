//! Trailing-window filtering over a metric series

use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::MetricSample;

/// Keep the samples with `timestamp >= now - window_seconds`, in input
/// order. The cutoff is inclusive. The result is a subsequence of the
/// input: nothing is reordered, duplicated, or fabricated.
///
/// `now` is captured once by the caller so a single derivation pass has
/// one consistent window edge.
pub fn filter_window(
    samples: &[MetricSample],
    window_seconds: i64,
    now: i64,
) -> Vec<MetricSample> {
    let cutoff = now - window_seconds;
    samples
        .iter()
        .filter(|s| s.timestamp >= cutoff)
        .cloned()
        .collect()
}

/// The most recent sample of a filtered series, or `None` when the
/// window holds nothing.
pub fn latest(filtered: &[MetricSample]) -> Option<&MetricSample> {
    filtered.last()
}

/// Current wall-clock time in epoch seconds
pub fn current_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
