#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::classify::backend::ClassifierBackend;
use crate::{Prediction, Sample};

/// Tract-based backend for ONNX letter classifiers.
///
/// Loads a local model plus a labels file (one label per line, in model
/// output order) and turns each inference pass into a full ranked sample.
/// No network I/O; the model is read from disk once at construction.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    labels: Vec<String>,
    width: u32,
    height: u32,
}

impl TractBackend {
    /// Load an ONNX model and its labels file.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        labels_path: P,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, height as usize, width as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        let labels = load_labels(labels_path.as_ref())?;

        Ok(Self {
            model,
            labels,
            width,
            height,
        })
    }

    fn build_input(&self, pixels: &[u8], width: u32, height: u32) -> Result<Tensor> {
        if width != self.width || height != self.height {
            return Err(anyhow!(
                "frame size {}x{} does not match model input {}x{}",
                width,
                height,
                self.width,
                self.height
            ));
        }

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;

        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGB bytes, received {}",
                expected_len,
                pixels.len()
            ));
        }

        let width = width as usize;
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, height as usize, width),
            |(_, channel, y, x)| {
                let idx = (y * width + x) * 3 + channel;
                pixels[idx] as f32 / 255.0
            },
        );

        Ok(input.into_tensor())
    }

    fn extract_scores(&self, outputs: TVec<TValue>) -> Result<Vec<f32>> {
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let scores: Vec<f32> = scores.iter().cloned().collect();
        if scores.len() != self.labels.len() {
            return Err(anyhow!(
                "model produced {} scores for {} labels",
                scores.len(),
                self.labels.len()
            ));
        }
        Ok(softmax(&scores))
    }
}

impl ClassifierBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Sample> {
        let input = self.build_input(pixels, width, height)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let probabilities = self.extract_scores(outputs)?;

        let predictions = self
            .labels
            .iter()
            .zip(probabilities)
            .map(|(label, probability)| Prediction::new(label.clone(), probability))
            .collect();

        Ok(Sample::new(predictions))
    }
}

fn load_labels(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read labels file {}", path.display()))?;
    let labels: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(anyhow!("labels file {} is empty", path.display()));
    }
    Ok(labels)
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|e| e / sum).collect()
    } else {
        vec![1.0 / scores.len() as f32; scores.len()]
    }
}
