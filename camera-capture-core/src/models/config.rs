use std::path::PathBuf;

use super::camera_models::CameraFacing;

/// Configuration for a camera session.
#[derive(Debug, Clone)]
pub struct SessionConfiguration {
    /// Album subdirectory under the Pictures collection.
    pub album: String,

    /// Override for the Pictures collection root. When `None`, the platform
    /// user-dirs lookup is used.
    pub pictures_root: Option<PathBuf>,

    /// JPEG quality for saved photos (1-100, default: 90).
    pub jpeg_quality: u8,

    /// Requested preview/capture width in pixels (default: 1280).
    pub width: u32,

    /// Requested preview/capture height in pixels (default: 720).
    pub height: u32,

    /// Specific camera device ID, or `None` for the platform default.
    pub device_id: Option<String>,

    /// Preferred camera facing when several devices are present.
    pub facing: CameraFacing,

    /// Deliver preview frames to the registered sink (default: true).
    pub enable_preview: bool,

    /// Prefix for photo file names (default: "IMG").
    pub file_prefix: String,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.album.is_empty() || self.album.contains(['/', '\\']) {
            return Err(format!("invalid album name: {:?}", self.album));
        }
        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(format!("invalid file prefix: {:?}", self.file_prefix));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!("unsupported jpeg quality: {}", self.jpeg_quality));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("invalid resolution: {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            album: "CameraKit".into(),
            pictures_root: None,
            jpeg_quality: 90,
            width: 1280,
            height: 720,
            device_id: None,
            facing: CameraFacing::Back,
            enable_preview: true,
            file_prefix: "IMG".into(),
        }
    }
}
