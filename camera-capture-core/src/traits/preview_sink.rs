use crate::models::camera_models::CameraFrame;

/// Consumer of preview frames — the view-finder surface of the embedding
/// screen.
///
/// Exactly one sink is wired per bind. Frames arrive on the provider's
/// streaming thread.
pub trait PreviewSink: Send + Sync {
    fn on_frame(&self, frame: &CameraFrame);
}
