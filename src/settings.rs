//! Live detector tuning.
//!
//! The two user-facing knobs (confidence threshold and commit delay) can be
//! adjusted while a session is running, e.g. from a UI thread. The session
//! snapshots the handle before every sample, so a change takes effect on
//! the very next tick without resetting detector state.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;
pub const DEFAULT_COMMIT_DELAY_MS: u64 = 2_000;
pub const MAX_COMMIT_DELAY_MS: u64 = 5_000;

/// A point-in-time snapshot of the tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Minimum top-candidate probability for a sample to qualify.
    pub confidence_threshold: f32,
    /// How long a streak must stay stable before it commits.
    pub commit_delay: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            commit_delay: Duration::from_millis(DEFAULT_COMMIT_DELAY_MS),
        }
    }
}

/// Cross-thread tuning handle.
///
/// The threshold is stored as raw f32 bits so both fields are lock-free;
/// the sampling loop must never block on a UI thread.
#[derive(Clone, Debug)]
pub struct SharedTuning {
    inner: Arc<TuningCell>,
}

#[derive(Debug)]
struct TuningCell {
    threshold_bits: AtomicU32,
    commit_delay_ms: AtomicU64,
}

impl SharedTuning {
    pub fn new(initial: Tuning) -> Self {
        Self {
            inner: Arc::new(TuningCell {
                threshold_bits: AtomicU32::new(initial.confidence_threshold.to_bits()),
                commit_delay_ms: AtomicU64::new(initial.commit_delay.as_millis() as u64),
            }),
        }
    }

    pub fn snapshot(&self) -> Tuning {
        Tuning {
            confidence_threshold: f32::from_bits(
                self.inner.threshold_bits.load(Ordering::Relaxed),
            ),
            commit_delay: Duration::from_millis(
                self.inner.commit_delay_ms.load(Ordering::Relaxed),
            ),
        }
    }

    /// Set the confidence threshold, clamped to [0, 1].
    pub fn set_confidence_threshold(&self, threshold: f32) {
        let clamped = threshold.clamp(0.0, 1.0);
        self.inner
            .threshold_bits
            .store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Set the commit delay, clamped to [0, 5000] ms.
    pub fn set_commit_delay(&self, delay: Duration) {
        let ms = (delay.as_millis() as u64).min(MAX_COMMIT_DELAY_MS);
        self.inner.commit_delay_ms.store(ms, Ordering::Relaxed);
    }
}

impl Default for SharedTuning {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
