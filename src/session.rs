//! Typing session.
//!
//! A session wires camera, classifier, detector, and transcript together
//! and drives the fixed-period sampling loop. Ticks are strictly
//! sequential: one capture, one classification, one detector update. The
//! detector never blocks, so the loop's cadence is set entirely by the
//! sample period and the classifier's latency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::classify::BackendRegistry;
use crate::ingest::CameraSource;
use crate::settings::SharedTuning;
use crate::stability::{Commit, StabilityDetector};
use crate::transcript::{CommitSink, TranscriptBuffer};
use crate::{Prediction, Sample};

pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(100);

/// What one tick produced, for display.
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    /// The full ranked sample, when classification ran.
    pub sample: Option<Sample>,
    /// Top candidate of this tick's sample.
    pub top: Option<Prediction>,
    /// Letter accepted on this tick, if any.
    pub commit: Option<Commit>,
    /// Detector streak length after this tick.
    pub streak: u32,
}

/// One camera-to-transcript pipeline run.
///
/// Sessions are single-use: create, connect, run, discard. Cancelling a
/// session throws away detector state - a pending near-commit is never
/// forced out.
pub struct TypingSession {
    source: CameraSource,
    registry: BackendRegistry,
    detector: StabilityDetector,
    transcript: TranscriptBuffer,
    tuning: SharedTuning,
    sample_period: Duration,
    samples_classified: u64,
    ticks_skipped: u64,
}

impl TypingSession {
    pub fn new(source: CameraSource, registry: BackendRegistry, tuning: SharedTuning) -> Self {
        Self {
            source,
            registry,
            detector: StabilityDetector::new(),
            transcript: TranscriptBuffer::new(),
            tuning,
            sample_period: DEFAULT_SAMPLE_PERIOD,
            samples_classified: 0,
            ticks_skipped: 0,
        }
    }

    pub fn with_sample_period(mut self, period: Duration) -> Self {
        self.sample_period = period;
        self
    }

    pub fn connect(&mut self) -> Result<()> {
        self.source.connect()
    }

    pub fn sample_period(&self) -> Duration {
        self.sample_period
    }

    /// Handle for adjusting threshold/delay from another thread.
    pub fn tuning(&self) -> SharedTuning {
        self.tuning.clone()
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut TranscriptBuffer {
        &mut self.transcript
    }

    pub fn source(&self) -> &CameraSource {
        &self.source
    }

    pub fn samples_classified(&self) -> u64 {
        self.samples_classified
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped
    }

    /// Run one sampling tick.
    ///
    /// Classifier failures are logged and skip the tick without touching
    /// detector state, so a flaky model behaves like a missed sample
    /// rather than a broken streak. Camera failures propagate; the caller
    /// decides whether the session survives them.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        let frame = self.source.next_frame()?;

        let sample = match self
            .registry
            .classify(frame.pixels(), frame.width, frame.height)
        {
            Ok(sample) => sample,
            Err(err) => {
                log::warn!("classification failed on frame {}: {}", frame.seq, err);
                self.ticks_skipped += 1;
                return Ok(TickOutcome {
                    streak: self.detector.streak_count(),
                    ..TickOutcome::default()
                });
            }
        };
        self.samples_classified += 1;

        let tuning = self.tuning.snapshot();
        let commit = self.detector.on_sample(&sample, now, &tuning)?;
        if let Some(commit) = &commit {
            self.transcript.append(&commit.label);
            log::info!(
                "typed '{}' after {} samples held {:?} (transcript: {} letters)",
                commit.label,
                commit.samples,
                commit.held,
                self.transcript.len()
            );
        }

        let top = sample.top_candidate()?.clone();
        Ok(TickOutcome {
            top: Some(top),
            sample: Some(sample),
            commit,
            streak: self.detector.streak_count(),
        })
    }

    /// Drive the sampling loop until `stop` is set.
    ///
    /// `on_tick` runs after every tick with the outcome, the transcript so
    /// far, and the source (for health display). Camera errors are logged
    /// and retried on the next tick rather than killing the loop.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        mut on_tick: impl FnMut(&TickOutcome, &TranscriptBuffer, &CameraSource),
    ) {
        while !stop.load(Ordering::Relaxed) {
            match self.tick(Instant::now()) {
                Ok(outcome) => on_tick(&outcome, &self.transcript, &self.source),
                Err(err) => log::error!("tick failed: {}", err),
            }
            std::thread::sleep(self.sample_period);
        }
        log::info!(
            "session stopped: {} samples classified, {} skipped, {} letters typed",
            self.samples_classified,
            self.ticks_skipped,
            self.transcript.len()
        );
    }
}
