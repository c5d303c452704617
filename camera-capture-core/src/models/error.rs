use thiserror::Error;

/// Errors raised while binding the camera session.
///
/// Bind failures are logged and leave no capture handle bound; they are never
/// shown to the user directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera not available")]
    CameraNotAvailable,

    #[error("camera device busy")]
    DeviceBusy,

    #[error("camera provider failed: {0}")]
    ProviderFailed(String),
}

/// Errors raised by a single capture request.
///
/// Terminal for that request; the user re-triggers the capture, nothing is
/// retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("configuration failed: {0}")]
    Configuration(String),

    #[error("frame acquisition failed: {0}")]
    FrameAcquisition(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}
