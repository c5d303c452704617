use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};

use crate::models::camera_models::{CameraFrame, PixelFormat};
use crate::models::config::SessionConfiguration;
use crate::models::error::CaptureError;
use crate::models::photo::{PhotoMetadata, SavedPhoto};
use crate::processing::pixel_format;
use crate::storage::metadata;

/// Writer for the shared Pictures media collection.
///
/// Resolves `{pictures_root}/{album}`, creates it on demand, and writes each
/// captured frame as a timestamped JPEG with a SHA-256 checksum and a JSON
/// metadata sidecar.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    album_dir: PathBuf,
    jpeg_quality: u8,
    file_prefix: String,
}

impl MediaLibrary {
    /// Resolve the Pictures collection for `config`.
    ///
    /// Uses the configured root when set, otherwise the platform user
    /// Pictures directory.
    pub fn new(config: &SessionConfiguration) -> Result<Self, CaptureError> {
        let root = config
            .pictures_root
            .clone()
            .or_else(dirs::picture_dir)
            .ok_or_else(|| CaptureError::StorageError("no pictures directory available".into()))?;

        Ok(Self {
            album_dir: root.join(&config.album),
            jpeg_quality: config.jpeg_quality,
            file_prefix: config.file_prefix.clone(),
        })
    }

    /// Album directory photos are written into.
    pub fn album_dir(&self) -> &Path {
        &self.album_dir
    }

    /// Encode `frame` as JPEG and write it into the album, returning the
    /// stored photo reference.
    pub fn save_photo(&self, frame: &CameraFrame) -> Result<SavedPhoto, CaptureError> {
        fs::create_dir_all(&self.album_dir)
            .map_err(|e| CaptureError::StorageError(format!("failed to create album directory: {}", e)))?;

        let file_name = self.timestamped_name(Local::now());
        let file_path = self.album_dir.join(&file_name);

        let jpeg = encode_jpeg(frame, self.jpeg_quality)?;
        fs::write(&file_path, &jpeg)
            .map_err(|e| CaptureError::StorageError(format!("failed to write photo: {}", e)))?;

        let checksum = hex_encode(&Sha256::digest(&jpeg));
        let photo_metadata =
            PhotoMetadata::new(&file_name, frame.width, frame.height, jpeg.len() as u64, &checksum);
        metadata::write_metadata(&photo_metadata, &file_path)?;

        Ok(SavedPhoto {
            file_path,
            checksum,
            metadata: photo_metadata,
        })
    }

    /// Timestamp-derived file name, millisecond precision:
    /// `{prefix}_{YYYYmmdd}_{HHMMSS}_{mmm}.jpg`.
    fn timestamped_name(&self, now: DateTime<Local>) -> String {
        format!("{}_{}.jpg", self.file_prefix, now.format("%Y%m%d_%H%M%S_%3f"))
    }
}

fn encode_jpeg(frame: &CameraFrame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    match frame.format {
        // Already a JPEG bitstream; store it verbatim.
        PixelFormat::Mjpeg => Ok(frame.data.clone()),
        PixelFormat::Rgb8 => encode_rgb(&frame.data, frame.width, frame.height, quality),
        PixelFormat::Yuyv => {
            let rgb = pixel_format::yuyv_to_rgb(&frame.data, frame.width, frame.height)
                .map_err(CaptureError::EncodingFailed)?;
            encode_rgb(&rgb, frame.width, frame.height, quality)
        }
    }
}

fn encode_rgb(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let expected = pixel_format::rgb_frame_size(width, height);
    if rgb.len() < expected {
        return Err(CaptureError::EncodingFailed(format!(
            "rgb buffer too small: {} bytes for {}x{}",
            rgb.len(),
            width,
            height
        )));
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&rgb[..expected], width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::EncodingFailed(format!("jpeg encoding failed: {}", e)))?;
    Ok(jpeg)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
