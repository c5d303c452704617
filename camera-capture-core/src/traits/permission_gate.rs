use std::sync::Arc;

use crate::models::state::PermissionState;

/// Callback receiving the outcome of a permission request.
pub type PermissionCallback = Arc<dyn Fn(PermissionState) + Send + Sync + 'static>;

/// Platform camera-permission surface.
///
/// Implemented by:
/// - `V4l2PermissionGate` (Linux device-node probe)
/// - Future: desktop-portal gates with real consent dialogs
pub trait PermissionGate: Send + Sync {
    /// Non-blocking check of the current grant. Never prompts the user.
    fn status(&self) -> PermissionState;

    /// Ask the platform for camera access.
    ///
    /// User-mediated and asynchronous; the outcome arrives through
    /// `on_result`, possibly after this call returns. There is a single
    /// request path — no rationale branching.
    fn request(&self, on_result: PermissionCallback);
}
