//! Captured video frames.

use anyhow::{anyhow, Result};

/// One captured RGB24 frame.
///
/// Produced by an ingest source, consumed read-only by classifier
/// backends. Frames are never retained past the tick that captured them.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Capture sequence number within the session.
    pub seq: u64,
}

impl VideoFrame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, seq: u64) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
            seq,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
