use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::CameraConfig;
use crate::settings::{
    Tuning, DEFAULT_COMMIT_DELAY_MS, DEFAULT_CONFIDENCE_THRESHOLD, MAX_COMMIT_DELAY_MS,
};

const DEFAULT_CAMERA_DEVICE: &str = "stub://camera";
const DEFAULT_CAMERA_FPS: u32 = 10;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 480;
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_SAMPLE_PERIOD_MS: u64 = 100;

#[derive(Debug, Deserialize, Default)]
struct SigntypedConfigFile {
    camera: Option<CameraConfigFile>,
    classifier: Option<ClassifierConfigFile>,
    detector: Option<DetectorConfigFile>,
    sample_period_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ClassifierConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    labels_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    confidence_threshold: Option<f32>,
    commit_delay_ms: Option<u64>,
}

/// Daemon configuration: JSON file named by `SIGNTYPE_CONFIG`, then
/// per-field env overrides, then validation.
#[derive(Debug, Clone)]
pub struct SigntypedConfig {
    pub camera: CameraConfig,
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub tuning: Tuning,
    pub sample_period: Duration,
}

impl SigntypedConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SIGNTYPE_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SigntypedConfigFile) -> Self {
        let camera = CameraConfig {
            device: file
                .camera
                .as_ref()
                .and_then(|camera| camera.device.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        let backend = file
            .classifier
            .as_ref()
            .and_then(|classifier| classifier.backend.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        let model_path = file
            .classifier
            .as_ref()
            .and_then(|classifier| classifier.model_path.clone());
        let labels_path = file
            .classifier
            .and_then(|classifier| classifier.labels_path);
        let tuning = Tuning {
            confidence_threshold: file
                .detector
                .as_ref()
                .and_then(|detector| detector.confidence_threshold)
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            commit_delay: Duration::from_millis(
                file.detector
                    .and_then(|detector| detector.commit_delay_ms)
                    .unwrap_or(DEFAULT_COMMIT_DELAY_MS),
            ),
        };
        let sample_period =
            Duration::from_millis(file.sample_period_ms.unwrap_or(DEFAULT_SAMPLE_PERIOD_MS));
        Self {
            camera,
            backend,
            model_path,
            labels_path,
            tuning,
            sample_period,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("SIGNTYPE_CAMERA") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(backend) = std::env::var("SIGNTYPE_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend;
            }
        }
        if let Ok(path) = std::env::var("SIGNTYPE_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.model_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var("SIGNTYPE_LABELS_PATH") {
            if !path.trim().is_empty() {
                self.labels_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(threshold) = std::env::var("SIGNTYPE_CONFIDENCE_THRESHOLD") {
            let value: f32 = threshold
                .parse()
                .map_err(|_| anyhow!("SIGNTYPE_CONFIDENCE_THRESHOLD must be a float"))?;
            self.tuning.confidence_threshold = value;
        }
        if let Ok(delay) = std::env::var("SIGNTYPE_COMMIT_DELAY_MS") {
            let ms: u64 = delay
                .parse()
                .map_err(|_| anyhow!("SIGNTYPE_COMMIT_DELAY_MS must be an integer"))?;
            self.tuning.commit_delay = Duration::from_millis(ms);
        }
        if let Ok(period) = std::env::var("SIGNTYPE_SAMPLE_PERIOD_MS") {
            let ms: u64 = period
                .parse()
                .map_err(|_| anyhow!("SIGNTYPE_SAMPLE_PERIOD_MS must be an integer"))?;
            self.sample_period = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tuning.confidence_threshold) {
            return Err(anyhow!(
                "confidence threshold {} is outside [0, 1]",
                self.tuning.confidence_threshold
            ));
        }
        if self.tuning.commit_delay.as_millis() as u64 > MAX_COMMIT_DELAY_MS {
            return Err(anyhow!(
                "commit delay {}ms exceeds the {}ms maximum",
                self.tuning.commit_delay.as_millis(),
                MAX_COMMIT_DELAY_MS
            ));
        }
        if self.sample_period.is_zero() {
            return Err(anyhow!("sample period must be greater than zero"));
        }
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera fps must be greater than zero"));
        }
        match self.backend.as_str() {
            "stub" => {}
            "tract" => {
                if self.model_path.is_none() || self.labels_path.is_none() {
                    return Err(anyhow!(
                        "the tract backend requires both model_path and labels_path"
                    ));
                }
            }
            other => return Err(anyhow!("unknown classifier backend '{}'", other)),
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SigntypedConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
