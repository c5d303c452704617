use crate::models::camera_models::SessionDiagnostics;
use crate::models::state::{LifecycleEvent, PermissionState, SessionState};

/// Object-safe facade over a camera session controller.
///
/// The embedding shell feeds lifecycle and permission events in and triggers
/// captures; results come back through the registered
/// [`SessionDelegate`](crate::traits::session_delegate::SessionDelegate).
pub trait CameraSession: Send {
    /// Current lifecycle state.
    fn state(&self) -> SessionState;

    /// Snapshot of session counters.
    fn diagnostics(&self) -> SessionDiagnostics;

    /// Feed a screen lifecycle event into the state machine.
    fn handle_lifecycle(&mut self, event: LifecycleEvent);

    /// Feed an externally-delivered permission outcome into the state
    /// machine. Binds the session if the screen is visible and unbound.
    fn handle_permission_result(&mut self, result: PermissionState);

    /// Request a still capture. A no-op unless the session is bound.
    fn capture_photo(&mut self);
}
