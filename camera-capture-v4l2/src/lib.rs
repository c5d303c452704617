//! # camera-capture-v4l2
//!
//! Linux V4L2 backend for camera-capture-kit.
//!
//! Provides:
//! - `V4l2Camera` — Camera capture via a `/dev/video*` node and mmap streaming
//! - `DeviceEnumerator` — Capture-capable device enumeration
//! - `permissions` — Device-node access probe as the camera permission gate
//!
//! ## Platform Requirements
//! - A V4L2-capable kernel (videodev2)
//! - Read access to the video device node (video group membership or ACLs)
//!
//! ## Usage
//! ```ignore
//! use camera_capture_core::{CameraSessionController, SessionConfiguration};
//! use camera_capture_v4l2::{V4l2Camera, V4l2PermissionGate};
//! use std::sync::Arc;
//!
//! let provider = V4l2Camera::default_device();
//! let gate = Arc::new(V4l2PermissionGate::default_device());
//! let controller =
//!     CameraSessionController::new(provider, gate, SessionConfiguration::default())?;
//! ```

#[cfg(target_os = "linux")]
pub mod device_enumerator;
#[cfg(target_os = "linux")]
pub mod permissions;
#[cfg(target_os = "linux")]
pub mod v4l2_camera;

#[cfg(target_os = "linux")]
pub use device_enumerator::DeviceEnumerator;
#[cfg(target_os = "linux")]
pub use permissions::V4l2PermissionGate;
#[cfg(target_os = "linux")]
pub use v4l2_camera::V4l2Camera;
