//! # camera-capture-core
//!
//! Platform-agnostic camera still-capture core library.
//!
//! Provides the permission-gated session lifecycle, preview fan-out, pixel
//! format conversion, and shared-Pictures JPEG storage. Platform-specific
//! backends (Linux V4L2, future desktop-portal stacks) implement the
//! `CameraProvider` trait and plug into the generic
//! `CameraSessionController`.
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/       ← CameraProvider, CameraSession, SessionDelegate, PermissionGate, PreviewSink
//! ├── models/       ← BindError, CaptureError, SessionState, SessionConfiguration, SavedPhoto, …
//! ├── processing/   ← FrameLatch, YUYV→RGB conversion
//! ├── session/      ← CameraSessionController (lifecycle state machine + capture worker)
//! └── storage/      ← MediaLibrary (Pictures collection writer), metadata sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::camera_models::{
    CameraFacing, CameraFrame, CameraSource, CaptureHandle, PixelFormat, SessionDiagnostics,
};
pub use models::config::SessionConfiguration;
pub use models::error::{BindError, CaptureError};
pub use models::photo::{PhotoMetadata, SavedPhoto};
pub use models::state::{LifecycleEvent, PermissionState, SessionState};
pub use processing::frame_latch::FrameLatch;
pub use session::controller::CameraSessionController;
pub use storage::media_library::MediaLibrary;
pub use traits::camera_provider::{CameraProvider, PreviewFrameCallback};
pub use traits::camera_session::CameraSession;
pub use traits::permission_gate::{PermissionCallback, PermissionGate};
pub use traits::preview_sink::PreviewSink;
pub use traits::session_delegate::SessionDelegate;
