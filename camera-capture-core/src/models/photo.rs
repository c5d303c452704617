use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reference to a photo saved in the shared Pictures collection.
///
/// Handed to the delegate when a capture completes; the session controller
/// does not retain it past reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPhoto {
    pub file_path: PathBuf,
    pub checksum: String,
    pub metadata: PhotoMetadata,
}

/// Metadata stored in a JSON sidecar next to each saved photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub checksum: String,
    pub created_at: String,
}

impl PhotoMetadata {
    pub fn new(file_name: &str, width: u32, height: u32, file_size: u64, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            width,
            height,
            file_size,
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
