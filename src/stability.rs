//! Stability detector.
//!
//! Raw classifier output fluctuates frame to frame even when the user holds
//! a steady gesture. This state machine accepts a letter only once a single
//! class has been sustained for both a minimum sample count and a minimum
//! wall-clock duration, and resets itself after each accepted letter so a
//! held gesture does not re-type every tick.
//!
//! States:
//! - IDLE: no qualifying streak (`last_label` is `None`)
//! - ACCUMULATING: a qualifying streak shorter than the required count
//! - STABLE_PENDING: the streak reached the required count and is waiting
//!   out the commit delay
//!
//! A below-threshold sample drops back to IDLE from any state. A qualifying
//! sample with a different top label restarts ACCUMULATING at count 1. After
//! a commit the detector resets fully, so even a still-held gesture must
//! accumulate a brand-new streak before it can repeat - an implicit cooldown
//! of `REQUIRED_STABLE_SAMPLES` ticks.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crate::settings::Tuning;
use crate::Sample;

/// Consecutive qualifying samples a streak needs before the commit delay
/// starts counting.
pub const REQUIRED_STABLE_SAMPLES: u32 = 10;

/// An accepted letter.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub label: String,
    /// Qualifying samples accumulated by the streak that committed.
    pub samples: u32,
    /// Time between the streak becoming stable and the commit.
    pub held: Duration,
}

#[derive(Clone, Debug, Default)]
struct DetectorState {
    /// Top label of the active qualifying streak, if any.
    last_label: Option<String>,
    /// Consecutive qualifying samples matching `last_label`.
    streak_count: u32,
    /// Set once, when the streak first reaches `REQUIRED_STABLE_SAMPLES`.
    streak_anchor: Option<Instant>,
}

impl DetectorState {
    fn reset(&mut self) {
        self.last_label = None;
        self.streak_count = 0;
        self.streak_anchor = None;
    }
}

/// Per-session debouncing state machine.
///
/// One instance per webcam session; state is never persisted. `on_sample`
/// performs only in-memory comparisons and is O(k) in the number of
/// classes, so it is safe to call from a fixed-period sampling loop.
#[derive(Debug, Default)]
pub struct StabilityDetector {
    state: DetectorState,
}

impl StabilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current streak length, for display.
    pub fn streak_count(&self) -> u32 {
        self.state.streak_count
    }

    /// Label of the active streak, for display.
    pub fn current_label(&self) -> Option<&str> {
        self.state.last_label.as_deref()
    }

    /// Feed one classification sample.
    ///
    /// Returns `Ok(Some(commit))` on the tick where the active streak has
    /// both reached `REQUIRED_STABLE_SAMPLES` and held through
    /// `tuning.commit_delay`. Tuning is read fresh on every call, so a
    /// mid-streak threshold change applies to future samples without
    /// invalidating the accumulated streak.
    pub fn on_sample(
        &mut self,
        sample: &Sample,
        now: Instant,
        tuning: &Tuning,
    ) -> Result<Option<Commit>> {
        if sample.is_empty() {
            return Err(anyhow!("cannot debounce an empty sample"));
        }
        let top = sample.top_candidate()?;

        if top.probability < tuning.confidence_threshold {
            self.state.reset();
            return Ok(None);
        }

        if self.state.last_label.as_deref() == Some(top.label.as_str()) {
            self.state.streak_count += 1;
        } else {
            // New letter: discard any prior streak, anchor included.
            self.state.last_label = Some(top.label.clone());
            self.state.streak_count = 1;
            self.state.streak_anchor = None;
        }

        if self.state.streak_count >= REQUIRED_STABLE_SAMPLES {
            match self.state.streak_anchor {
                None => {
                    // The instant the streak first became stable. It does
                    // not move on later samples of the same label.
                    self.state.streak_anchor = Some(now);
                }
                Some(anchor) => {
                    if now.duration_since(anchor) >= tuning.commit_delay {
                        let commit = Commit {
                            label: top.label.clone(),
                            samples: self.state.streak_count,
                            held: now.duration_since(anchor),
                        };
                        self.state.reset();
                        return Ok(Some(commit));
                    }
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Prediction;

    const TICK: Duration = Duration::from_millis(100);

    fn tuning() -> Tuning {
        Tuning {
            confidence_threshold: 0.7,
            commit_delay: Duration::from_millis(2_000),
        }
    }

    fn sample(label: &str, probability: f32) -> Sample {
        Sample::new(vec![Prediction::new(label, probability)])
    }

    #[test]
    fn below_threshold_samples_reset_the_streak() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        for i in 0..5 {
            let commit = detector
                .on_sample(&sample("A", 0.9), t0 + TICK * i, &tuning)
                .unwrap();
            assert!(commit.is_none());
        }
        assert_eq!(detector.streak_count(), 5);

        let commit = detector
            .on_sample(&sample("A", 0.5), t0 + TICK * 5, &tuning)
            .unwrap();
        assert!(commit.is_none());
        assert_eq!(detector.streak_count(), 0);
        assert_eq!(detector.current_label(), None);
    }

    #[test]
    fn short_streaks_never_commit_regardless_of_elapsed_time() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        // 9 samples spread over a minute: plenty of wall-clock time, one
        // sample short of stable.
        for i in 0..9u32 {
            let commit = detector
                .on_sample(&sample("B", 0.95), t0 + Duration::from_secs(7) * i, &tuning)
                .unwrap();
            assert!(commit.is_none());
        }
        assert_eq!(detector.streak_count(), 9);
    }

    #[test]
    fn anchor_is_set_at_stability_and_does_not_slide() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        // Samples at t=0..900ms; count reaches 10 at t=900ms.
        for i in 0..10 {
            assert!(detector
                .on_sample(&sample("A", 0.9), t0 + TICK * i, &tuning)
                .unwrap()
                .is_none());
        }

        // Keep holding. No commit until now - 900ms >= 2000ms.
        let mut committed_at = None;
        for i in 10..40 {
            let now = t0 + TICK * i;
            if let Some(commit) = detector.on_sample(&sample("A", 0.9), now, &tuning).unwrap() {
                assert_eq!(commit.label, "A");
                committed_at = Some(i);
                break;
            }
        }
        assert_eq!(committed_at, Some(29), "first commit expected at t=2900ms");
    }

    #[test]
    fn different_label_restarts_the_streak() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        for i in 0..12 {
            detector
                .on_sample(&sample("A", 0.9), t0 + TICK * i, &tuning)
                .unwrap();
        }
        assert!(detector.streak_count() >= REQUIRED_STABLE_SAMPLES);

        // A qualifying sample of a different letter invalidates all prior
        // progress, anchor included.
        detector
            .on_sample(&sample("B", 0.9), t0 + TICK * 12, &tuning)
            .unwrap();
        assert_eq!(detector.current_label(), Some("B"));
        assert_eq!(detector.streak_count(), 1);

        // The old anchor must not leak into the new streak: even far past
        // the original delay window, B cannot commit until its own streak
        // stabilizes and holds.
        let commit = detector
            .on_sample(&sample("B", 0.9), t0 + Duration::from_secs(60), &tuning)
            .unwrap();
        assert!(commit.is_none());
    }

    #[test]
    fn commit_resets_state_and_imposes_a_cooldown() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        let mut first_commit = None;
        let mut i = 0u32;
        while first_commit.is_none() {
            first_commit = detector
                .on_sample(&sample("A", 0.9), t0 + TICK * i, &tuning)
                .unwrap();
            i += 1;
        }
        assert_eq!(detector.streak_count(), 0);
        assert_eq!(detector.current_label(), None);

        // The gesture is still held and the delay has long elapsed in
        // wall-clock terms, but the second commit still needs a full
        // 10-sample streak plus its own delay window.
        let resume = i;
        let mut second_commit_at = None;
        for j in resume..resume + 40 {
            if detector
                .on_sample(&sample("A", 0.9), t0 + TICK * j, &tuning)
                .unwrap()
                .is_some()
            {
                second_commit_at = Some(j - resume);
                break;
            }
        }
        // 10 samples to stabilize (indices 0..9), anchor at the 10th, then
        // 20 more ticks of delay.
        assert_eq!(second_commit_at, Some(29));
    }

    #[test]
    fn reference_scenario_commits_a_at_2900ms() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = tuning();

        let mut commits = Vec::new();
        for i in 0..=29 {
            let now = t0 + TICK * i;
            if let Some(commit) = detector.on_sample(&sample("A", 0.9), now, &tuning).unwrap() {
                commits.push((i, commit));
            }
        }

        assert_eq!(commits.len(), 1);
        let (tick, commit) = &commits[0];
        assert_eq!(*tick, 29);
        assert_eq!(commit.label, "A");
        assert_eq!(commit.held, Duration::from_millis(2_000));
        assert_eq!(detector.streak_count(), 0);
    }

    #[test]
    fn tuning_changes_apply_on_the_next_sample() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let mut tuning = tuning();

        for i in 0..5 {
            detector
                .on_sample(&sample("A", 0.8), t0 + TICK * i, &tuning)
                .unwrap();
        }
        assert_eq!(detector.streak_count(), 5);

        // Raising the threshold mid-streak does not retroactively
        // invalidate the streak, but the same confidence no longer
        // qualifies on the next tick.
        tuning.confidence_threshold = 0.85;
        let commit = detector
            .on_sample(&sample("A", 0.8), t0 + TICK * 5, &tuning)
            .unwrap();
        assert!(commit.is_none());
        assert_eq!(detector.streak_count(), 0);
    }

    #[test]
    fn zero_commit_delay_commits_one_tick_after_stability() {
        let mut detector = StabilityDetector::new();
        let t0 = Instant::now();
        let tuning = Tuning {
            confidence_threshold: 0.7,
            commit_delay: Duration::ZERO,
        };

        // Anchor is set on the 10th qualifying sample; with zero delay the
        // commit fires on the 11th.
        for i in 0..10 {
            assert!(detector
                .on_sample(&sample("C", 0.9), t0 + TICK * i, &tuning)
                .unwrap()
                .is_none());
        }
        let commit = detector
            .on_sample(&sample("C", 0.9), t0 + TICK * 10, &tuning)
            .unwrap();
        assert_eq!(commit.unwrap().label, "C");
    }

    #[test]
    fn empty_sample_is_rejected() {
        let mut detector = StabilityDetector::new();
        let err = detector
            .on_sample(&Sample::default(), Instant::now(), &tuning())
            .unwrap_err();
        assert!(err.to_string().contains("empty sample"));
    }
}
