//! V4L2 camera capture provider.
//!
//! Streams frames from a `/dev/video*` node on a dedicated thread using
//! memory-mapped buffers. Preview frames go to the bound callback and into a
//! latch; still captures are served from the most recent latched frame.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use camera_capture_core::models::camera_models::{
    CameraFacing, CameraFrame, CameraSource, PixelFormat,
};
use camera_capture_core::models::config::SessionConfiguration;
use camera_capture_core::models::error::{BindError, CaptureError};
use camera_capture_core::processing::frame_latch::FrameLatch;
use camera_capture_core::traits::camera_provider::{CameraProvider, PreviewFrameCallback};

const STREAM_BUFFERS: u32 = 4;
const DEFAULT_DEVICE: &str = "/dev/video0";

/// V4L2 camera capture.
///
/// Opens the node at bind time and delivers frames on a dedicated streaming
/// thread until unbound.
pub struct V4l2Camera {
    device_path: PathBuf,
    running: Arc<AtomicBool>,
    stream_handle: Mutex<Option<thread::JoinHandle<()>>>,
    latch: Arc<Mutex<FrameLatch>>,
}

impl V4l2Camera {
    /// Capture from the system default camera node.
    pub fn default_device() -> Self {
        Self::with_path(DEFAULT_DEVICE)
    }

    /// Capture from a specific `/dev/video*` node.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            device_path: path.as_ref().to_path_buf(),
            running: Arc::new(AtomicBool::new(false)),
            stream_handle: Mutex::new(None),
            latch: Arc::new(Mutex::new(FrameLatch::new())),
        }
    }

    /// Negotiate resolution and pixel format.
    ///
    /// Prefers MJPG (frames are already JPEG bitstreams), falls back to
    /// YUYV. The driver may adjust the resolution; the negotiated values win.
    fn negotiate_format(dev: &Device, config: &SessionConfiguration) -> io::Result<v4l::Format> {
        let mut fmt = dev.format()?;
        fmt.width = config.width;
        fmt.height = config.height;
        fmt.fourcc = FourCC::new(b"MJPG");

        let negotiated = dev.set_format(&fmt)?;
        if negotiated.fourcc == FourCC::new(b"MJPG") {
            return Ok(negotiated);
        }

        fmt.fourcc = FourCC::new(b"YUYV");
        dev.set_format(&fmt)
    }
}

fn pixel_format_for(fourcc: FourCC) -> Option<PixelFormat> {
    match &fourcc.repr {
        b"MJPG" => Some(PixelFormat::Mjpeg),
        b"YUYV" => Some(PixelFormat::Yuyv),
        b"RGB3" => Some(PixelFormat::Rgb8),
        _ => None,
    }
}

impl CameraProvider for V4l2Camera {
    fn is_available(&self) -> bool {
        self.device_path.exists()
    }

    fn bind(
        &mut self,
        config: &SessionConfiguration,
        callback: PreviewFrameCallback,
    ) -> Result<(), BindError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(BindError::DeviceBusy);
        }

        let dev = Device::with_path(&self.device_path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => BindError::PermissionDenied,
            io::ErrorKind::NotFound => BindError::CameraNotAvailable,
            _ => BindError::ProviderFailed(format!(
                "failed to open {}: {}",
                self.device_path.display(),
                e
            )),
        })?;

        let fmt = Self::negotiate_format(&dev, config)
            .map_err(|e| BindError::ProviderFailed(format!("format negotiation failed: {}", e)))?;
        let format = pixel_format_for(fmt.fourcc).ok_or_else(|| {
            BindError::ProviderFailed(format!("unsupported pixel format {}", fmt.fourcc))
        })?;

        log::debug!(
            "bound {} at {}x{} {}",
            self.device_path.display(),
            fmt.width,
            fmt.height,
            fmt.fourcc
        );

        self.latch.lock().clear();
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let latch = Arc::clone(&self.latch);
        let (width, height) = (fmt.width, fmt.height);

        let handle = thread::Builder::new()
            .name("v4l2-preview-stream".into())
            .spawn(move || {
                if let Err(e) = stream_loop(&dev, &running, &latch, &callback, width, height, format)
                {
                    log::error!("preview stream stopped: {}", e);
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                BindError::ProviderFailed(format!("failed to spawn stream thread: {}", e))
            })?;

        *self.stream_handle.lock() = Some(handle);
        Ok(())
    }

    fn unbind(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        // The join returns once the in-flight dequeue completes.
        if let Some(handle) = self.stream_handle.lock().take() {
            let _ = handle.join();
        }
        self.latch.lock().clear();
    }

    fn still_frame(&mut self) -> Result<CameraFrame, CaptureError> {
        self.latch
            .lock()
            .latest()
            .ok_or_else(|| CaptureError::FrameAcquisition("no preview frame available yet".into()))
    }

    fn device_info(&self) -> CameraSource {
        CameraSource {
            id: self.device_path.display().to_string(),
            name: self.device_path.display().to_string(),
            facing: CameraFacing::Unknown,
            is_default: self.device_path == Path::new(DEFAULT_DEVICE),
        }
    }
}

fn stream_loop(
    dev: &Device,
    running: &AtomicBool,
    latch: &Mutex<FrameLatch>,
    callback: &PreviewFrameCallback,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> io::Result<()> {
    let mut stream = MmapStream::with_buffers(dev, Type::VideoCapture, STREAM_BUFFERS)?;

    while running.load(Ordering::SeqCst) {
        let (data, meta) = stream.next()?;

        // MJPG buffers are only partially filled; bytesused bounds the frame.
        let used = match meta.bytesused as usize {
            0 => data.len(),
            used => used.min(data.len()),
        };

        let frame = CameraFrame {
            data: data[..used].to_vec(),
            width,
            height,
            format,
            sequence: meta.sequence as u64,
        };
        latch.lock().store(frame.clone());
        callback(&frame);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_not_available() {
        let camera = V4l2Camera::with_path("/dev/video200");
        assert!(!camera.is_available());
    }

    #[test]
    fn bind_to_missing_device_reports_not_available() {
        let mut camera = V4l2Camera::with_path("/dev/video200");
        let result = camera.bind(&SessionConfiguration::default(), Arc::new(|_| {}));
        assert_eq!(result, Err(BindError::CameraNotAvailable));
    }

    #[test]
    fn still_frame_without_stream_is_an_acquisition_error() {
        let mut camera = V4l2Camera::with_path("/dev/video200");
        assert!(matches!(
            camera.still_frame(),
            Err(CaptureError::FrameAcquisition(_))
        ));
    }

    #[test]
    fn unbind_is_idempotent() {
        let mut camera = V4l2Camera::with_path("/dev/video200");
        camera.unbind();
        camera.unbind();
    }

    #[test]
    fn fourcc_mapping() {
        assert_eq!(pixel_format_for(FourCC::new(b"MJPG")), Some(PixelFormat::Mjpeg));
        assert_eq!(pixel_format_for(FourCC::new(b"YUYV")), Some(PixelFormat::Yuyv));
        assert_eq!(pixel_format_for(FourCC::new(b"H264")), None);
    }
}
