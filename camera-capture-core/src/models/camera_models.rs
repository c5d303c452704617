use serde::{Deserialize, Serialize};

/// Direction a camera faces, relative to the device user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    Back,
    External,
    Unknown,
}

/// A camera device available for capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSource {
    pub id: String,
    pub name: String,
    pub facing: CameraFacing,
    pub is_default: bool,
}

/// Pixel layout of a [`CameraFrame`]'s data buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 24-bit RGB, 3 bytes per pixel.
    Rgb8,
    /// Packed YUV 4:2:2, 2 bytes per pixel.
    Yuyv,
    /// A complete JPEG bitstream; width/height are informational.
    Mjpeg,
}

impl PixelFormat {
    /// Whether the buffer is a compressed bitstream rather than raw pixels.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Mjpeg)
    }
}

/// One frame of camera output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub sequence: u64,
}

/// Capability object proving that camera output is bound and ready to
/// capture.
///
/// Created when binding succeeds, dropped on teardown, and owned exclusively
/// by the session controller. A capture request without a live handle is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureHandle {
    device: CameraSource,
}

impl CaptureHandle {
    pub(crate) fn new(device: CameraSource) -> Self {
        Self { device }
    }

    /// The device this handle was bound against.
    pub fn device(&self) -> &CameraSource {
        &self.device
    }
}

/// Diagnostics for debugging capture sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionDiagnostics {
    pub bind_attempts: u64,
    pub preview_frames: u64,
    pub capture_attempts: u64,
    pub photos_saved: u64,
    pub capture_failures: u64,
    pub bytes_written: u64,
}
