use std::fs;
use std::path::Path;

use crate::models::error::CaptureError;
use crate::models::photo::PhotoMetadata;

/// Write photo metadata as a JSON sidecar file.
///
/// Creates `{photo}.metadata.json` alongside the photo.
pub fn write_metadata(metadata: &PhotoMetadata, photo_path: &Path) -> Result<(), CaptureError> {
    let metadata_path = photo_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read photo metadata from a JSON sidecar file.
pub fn read_metadata(photo_path: &Path) -> Result<PhotoMetadata, CaptureError> {
    let metadata_path = photo_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: PhotoMetadata = serde_json::from_str(&json)
        .map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_roundtrip() {
        let dir = std::env::temp_dir().join("camera_capture_test_metadata");
        fs::create_dir_all(&dir).unwrap();
        let photo_path = dir.join("IMG_20260807_120000_000.jpg");

        let metadata = PhotoMetadata::new("IMG_20260807_120000_000.jpg", 640, 480, 1234, "abcd");
        write_metadata(&metadata, &photo_path).unwrap();

        assert!(photo_path
            .with_extension("metadata.json")
            .exists());
        assert_eq!(read_metadata(&photo_path).unwrap(), metadata);
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let photo_path = std::env::temp_dir().join("camera_capture_test_metadata_missing.jpg");
        assert!(matches!(
            read_metadata(&photo_path),
            Err(CaptureError::StorageError(_))
        ));
    }
}
