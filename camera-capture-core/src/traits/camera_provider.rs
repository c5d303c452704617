use std::sync::Arc;

use crate::models::camera_models::{CameraFrame, CameraSource};
use crate::models::config::SessionConfiguration;
use crate::models::error::{BindError, CaptureError};

/// Callback invoked for every preview frame the provider produces.
///
/// The callback fires on the provider's streaming thread — keep processing
/// minimal and hand heavy work elsewhere.
pub type PreviewFrameCallback = Arc<dyn Fn(&CameraFrame) + Send + Sync + 'static>;

/// Interface for platform-specific camera stacks.
///
/// Implemented by:
/// - `V4l2Camera` (Linux)
/// - Future: `PipewirePortalCamera`, `AvfCamera` (macOS)
pub trait CameraProvider: Send {
    /// Whether the backing device is currently present.
    fn is_available(&self) -> bool;

    /// Open the device and begin streaming preview frames via `callback`.
    ///
    /// A successful bind stays active until [`unbind`](Self::unbind).
    fn bind(
        &mut self,
        config: &SessionConfiguration,
        callback: PreviewFrameCallback,
    ) -> Result<(), BindError>;

    /// Stop streaming and release the device. Idempotent.
    fn unbind(&mut self);

    /// Grab a still frame. Only valid while bound.
    fn still_frame(&mut self) -> Result<CameraFrame, CaptureError>;

    /// Information about the camera device backing this provider.
    fn device_info(&self) -> CameraSource;
}
