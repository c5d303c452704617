//! V4L2 capture device enumeration.

use v4l::capability::Flags;
use v4l::context;
use v4l::Device;

use camera_capture_core::models::camera_models::{CameraFacing, CameraSource};

/// Enumerates `/dev/video*` nodes that expose video capture.
///
/// Nodes that cannot be opened (missing permission, metadata-only devices)
/// are skipped rather than reported as errors.
pub struct DeviceEnumerator;

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self
    }

    /// List capture-capable camera devices.
    pub fn list_capture_devices(&self) -> Vec<CameraSource> {
        let mut sources = Vec::new();
        for node in context::enum_devices() {
            let index = node.index();
            let dev = match Device::new(index) {
                Ok(dev) => dev,
                Err(e) => {
                    log::debug!("skipping video{}: {}", index, e);
                    continue;
                }
            };
            let caps = match dev.query_caps() {
                Ok(caps) => caps,
                Err(e) => {
                    log::debug!("skipping video{}: query_caps failed: {}", index, e);
                    continue;
                }
            };
            if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
                continue;
            }

            sources.push(CameraSource {
                id: node.path().display().to_string(),
                name: node.name().unwrap_or_else(|| caps.card.clone()),
                // V4L2 reports no facing; desktop cameras are external.
                facing: CameraFacing::Unknown,
                is_default: index == 0,
            });
        }
        sources
    }
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}
