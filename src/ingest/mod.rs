//! Camera frame ingestion.
//!
//! Sources produce `VideoFrame` instances for the sampling loop:
//! - Local V4L2 devices (feature: ingest-v4l2)
//! - Stub source (`stub://` paths, testing and the demo)
//!
//! The ingestion layer owns capture and pixel-format normalization only;
//! it never interprets frame content.

pub mod camera;
#[cfg(feature = "ingest-v4l2")]
mod normalize;

pub use camera::{CameraConfig, CameraSource, CameraStats};
