use crate::models::error::CaptureError;
use crate::models::photo::SavedPhoto;
use crate::models::state::{PermissionState, SessionState};

/// Event delegate for camera session notifications.
///
/// Methods may be called from the controller's thread or from the capture
/// worker thread. Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called on every session state transition.
    fn on_state_changed(&self, state: SessionState);

    /// Called when an externally-delivered permission outcome is observed.
    fn on_permission_changed(&self, state: PermissionState);

    /// Called when a capture completes and the photo is in the Pictures
    /// collection.
    fn on_photo_saved(&self, photo: &SavedPhoto);

    /// Called when a capture request fails. Bind failures are not reported
    /// here; they surface only as a transition back to
    /// [`SessionState::Unbound`].
    fn on_capture_error(&self, error: &CaptureError);
}
