//! SignType - debounced sign-language typing.
//!
//! This crate turns a noisy, continuously-sampled classification stream
//! (per-frame letter predictions with confidence scores) into discrete,
//! intentional "typed" characters.
//!
//! # Architecture
//!
//! The pipeline is a straight line:
//!
//! ```text
//! CameraSource -> ClassifierBackend -> StabilityDetector -> CommitSink
//! ```
//!
//! - `ingest`: camera frame sources (V4L2, synthetic stub)
//! - `classify`: pluggable classifier backends producing ranked samples
//! - `stability`: the debouncing state machine that decides when a held
//!   gesture becomes a typed letter
//! - `transcript`: the typed-output buffer commits are appended to
//! - `session`: wires the pieces together and drives the sampling loop
//!
//! The classifier is treated as an opaque oracle: each tick it produces a
//! full set of `(label, probability)` pairs and the rest of the pipeline
//! never looks inside it.

use anyhow::{anyhow, Result};

pub mod classify;
pub mod config;
pub mod frame;
pub mod ingest;
pub mod session;
pub mod settings;
pub mod stability;
pub mod transcript;
pub mod ui;

pub use classify::{BackendRegistry, ClassifierBackend, StubBackend};
pub use frame::VideoFrame;
pub use ingest::{CameraConfig, CameraSource};
pub use session::{TickOutcome, TypingSession};
pub use settings::{SharedTuning, Tuning};
pub use stability::{Commit, StabilityDetector, REQUIRED_STABLE_SAMPLES};
pub use transcript::{CommitSink, TranscriptBuffer};

/// One class score from a classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// One tick's full set of class predictions.
///
/// Samples are not assumed to be sorted; `top_candidate` scans for the
/// maximum probability and breaks ties by first occurrence in input order.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    predictions: Vec<Prediction>,
}

impl Sample {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// The highest-confidence prediction.
    ///
    /// Ties break toward the earlier entry (strict greater-than scan), so
    /// classifier output order is preserved for equal scores. An empty
    /// sample is a caller bug and is reported as an error rather than
    /// silently defaulted.
    pub fn top_candidate(&self) -> Result<&Prediction> {
        let mut best: Option<&Prediction> = None;
        for prediction in &self.predictions {
            match best {
                Some(current) if prediction.probability > current.probability => {
                    best = Some(prediction);
                }
                None => best = Some(prediction),
                _ => {}
            }
        }
        best.ok_or_else(|| anyhow!("sample contains no class predictions"))
    }
}

impl From<Vec<(String, f32)>> for Sample {
    fn from(pairs: Vec<(String, f32)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, probability)| Prediction { label, probability })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_candidate_picks_maximum() {
        let sample = Sample::new(vec![
            Prediction::new("A", 0.1),
            Prediction::new("B", 0.7),
            Prediction::new("C", 0.2),
        ]);
        assert_eq!(sample.top_candidate().unwrap().label, "B");
    }

    #[test]
    fn top_candidate_ties_break_by_input_order() {
        let sample = Sample::new(vec![
            Prediction::new("X", 0.5),
            Prediction::new("Y", 0.5),
            Prediction::new("Z", 0.5),
        ]);
        assert_eq!(sample.top_candidate().unwrap().label, "X");
    }

    #[test]
    fn empty_sample_is_an_error() {
        let sample = Sample::default();
        assert!(sample.top_candidate().is_err());
    }
}
