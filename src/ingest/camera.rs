//! Camera frame source.
//!
//! `CameraSource` captures RGB frames from a local V4L2 device, with a
//! synthetic fallback for `stub://` paths.
//!
//! The synthetic source simulates a signer in front of the camera: the
//! "scene" holds steady for a stretch of frames (a held gesture) and then
//! switches, which is what the downstream stub classifier keys off.

use anyhow::Result;
#[cfg(feature = "ingest-v4l2")]
use anyhow::Context;
#[cfg(feature = "ingest-v4l2")]
use std::time::{Duration, Instant};

use crate::frame::VideoFrame;

/// Number of synthetic frames a simulated gesture is held before the
/// scene switches.
const SYNTHETIC_HOLD_FRAMES: u64 = 40;

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0") or "stub://" for synthetic frames.
    pub device: String,
    /// Target frame rate (frames per second).
    pub target_fps: u32,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "stub://camera".to_string(),
            target_fps: 10,
            width: 640,
            height: 480,
        }
    }
}

/// Camera frame source.
pub struct CameraSource {
    backend: CameraBackend,
}

enum CameraBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "ingest-v4l2")]
    Device(DeviceSource),
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Result<Self> {
        if config.device.starts_with("stub://") {
            Ok(Self {
                backend: CameraBackend::Synthetic(SyntheticSource::new(config)),
            })
        } else {
            #[cfg(feature = "ingest-v4l2")]
            {
                Ok(Self {
                    backend: CameraBackend::Device(DeviceSource::new(config)?),
                })
            }
            #[cfg(not(feature = "ingest-v4l2"))]
            {
                anyhow::bail!("camera devices require the ingest-v4l2 feature")
            }
        }
    }

    /// Connect to the camera.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.connect(),
            #[cfg(feature = "ingest-v4l2")]
            CameraBackend::Device(source) => source.connect(),
        }
    }

    /// Capture the next frame.
    pub fn next_frame(&mut self) -> Result<VideoFrame> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "ingest-v4l2")]
            CameraBackend::Device(source) => source.next_frame(),
        }
    }

    /// Check if the source is healthy.
    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.is_healthy(),
            #[cfg(feature = "ingest-v4l2")]
            CameraBackend::Device(source) => source.is_healthy(),
        }
    }

    /// Get capture statistics.
    pub fn stats(&self) -> CameraStats {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "ingest-v4l2")]
            CameraBackend::Device(source) => source.stats(),
        }
    }
}

/// Statistics for a camera source.
#[derive(Clone, Debug)]
pub struct CameraStats {
    pub frames_captured: u64,
    pub device: String,
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests and the demo
// ----------------------------------------------------------------------------

struct SyntheticSource {
    config: CameraConfig,
    frame_count: u64,
    /// Simulated "gesture" state. Stays fixed for a stretch of frames so
    /// the stub classifier sees a stable scene, then switches.
    scene_state: u8,
}

impl SyntheticSource {
    fn new(config: CameraConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            scene_state: 0,
        }
    }

    /// Synthetic sources are always "connected".
    fn connect(&mut self) -> Result<()> {
        log::info!("CameraSource: connected to {} (synthetic)", self.config.device);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        self.frame_count += 1;
        if self.frame_count % SYNTHETIC_HOLD_FRAMES == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let pixels = self.generate_synthetic_pixels();
        VideoFrame::new(pixels, self.config.width, self.config.height, self.frame_count)
    }

    /// Generate synthetic pixel data.
    ///
    /// Pixels depend on the scene state only, not the frame count: while a
    /// simulated gesture is held, identical frames come out, matching what
    /// a steady camera pointed at a steady hand produces.
    fn generate_synthetic_pixels(&self) -> Vec<u8> {
        let pixel_count = (self.config.width * self.config.height * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.scene_state as u64 * 31) % 256) as u8;
        }
        pixels
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> CameraStats {
        CameraStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// V4L2 device source
// ----------------------------------------------------------------------------

#[cfg(feature = "ingest-v4l2")]
struct DeviceSource {
    config: CameraConfig,
    state: Option<DeviceState>,
    frame_count: u64,
    last_frame_at: Option<Instant>,
    last_error: Option<String>,
    active_width: u32,
    active_height: u32,
    active_format: super::normalize::PixelFormat,
}

#[cfg(feature = "ingest-v4l2")]
#[ouroboros::self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

#[cfg(feature = "ingest-v4l2")]
impl DeviceSource {
    fn new(config: CameraConfig) -> Result<Self> {
        Ok(Self {
            active_width: config.width,
            active_height: config.height,
            active_format: super::normalize::PixelFormat::Rgb24,
            config,
            state: None,
            frame_count: 0,
            last_frame_at: None,
            last_error: None,
        })
    }

    fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.config.device)
            .with_context(|| format!("open v4l2 device {}", self.config.device))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "CameraSource: failed to set format on {}: {}",
                    self.config.device,
                    err
                );
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!(
                    "CameraSource: failed to set fps on {}: {}",
                    self.config.device,
                    err
                );
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;
        self.active_format = super::normalize::PixelFormat::from_fourcc(&format.fourcc.repr)?;
        self.last_error = None;

        let state = DeviceStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()
        .map_err(|err| {
            self.last_error = Some(err.to_string());
            err
        })?;
        self.state = Some(state);

        log::info!(
            "CameraSource: connected to {} ({}x{})",
            self.config.device,
            self.active_width,
            self.active_height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        use v4l::io::traits::CaptureStream;

        let state = self.state.as_mut().context("v4l2 device not connected")?;
        let (buf, _meta) = state
            .with_mut(|fields| fields.stream.next())
            .map_err(|err| {
                self.last_error = Some(err.to_string());
                anyhow::Error::new(err).context("capture v4l2 frame")
            })?;

        let pixels = super::normalize::normalize_to_rgb(
            buf,
            self.active_width,
            self.active_height,
            self.active_format,
        )?;

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());

        VideoFrame::new(pixels, self.active_width, self.active_height, self.frame_count)
    }

    fn is_healthy(&self) -> bool {
        if self.last_error.is_some() {
            return false;
        }
        let Some(last_frame_at) = self.last_frame_at else {
            return true;
        };
        last_frame_at.elapsed() <= self.health_grace()
    }

    fn stats(&self) -> CameraStats {
        CameraStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }

    fn health_grace(&self) -> Duration {
        let base_ms = if self.config.target_fps == 0 {
            2_000
        } else {
            (1000 / self.config.target_fps).saturating_mul(6)
        };
        Duration::from_millis(base_ms.max(2_000) as u64)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
