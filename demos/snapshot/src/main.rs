//! One-shot capture demo.
//!
//! Plays the role of the embedding screen: reports lifecycle events to the
//! session controller, waits for the preview to warm up, requests one still
//! capture, and prints where the photo landed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parking_lot::Mutex;

use camera_capture_core::{
    CameraFrame, CameraSessionController, CaptureError, LifecycleEvent, PermissionState,
    PreviewSink, SavedPhoto, SessionConfiguration, SessionDelegate, SessionState,
};
use camera_capture_v4l2::{V4l2Camera, V4l2PermissionGate};

#[derive(Parser)]
#[command(name = "snapshot", about = "Capture a still photo from a V4L2 camera")]
struct Args {
    /// Video device node
    #[arg(long, default_value = "/dev/video0")]
    device: PathBuf,

    /// Album directory under the Pictures collection
    #[arg(long, default_value = "CameraKit")]
    album: String,

    /// Override the Pictures collection root
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 90)]
    quality: u8,

    /// Preview warm-up before the capture, in milliseconds
    #[arg(long, default_value_t = 500)]
    warmup_ms: u64,
}

enum Outcome {
    Saved(SavedPhoto),
    Failed(CaptureError),
}

/// Forwards capture outcomes to the main thread and logs everything else.
struct ConsoleDelegate {
    outcomes: Mutex<mpsc::Sender<Outcome>>,
}

impl SessionDelegate for ConsoleDelegate {
    fn on_state_changed(&self, state: SessionState) {
        log::info!("session state: {:?}", state);
    }

    fn on_permission_changed(&self, state: PermissionState) {
        log::info!("camera permission: {:?}", state);
    }

    fn on_photo_saved(&self, photo: &SavedPhoto) {
        let _ = self.outcomes.lock().send(Outcome::Saved(photo.clone()));
    }

    fn on_capture_error(&self, error: &CaptureError) {
        let _ = self.outcomes.lock().send(Outcome::Failed(error.clone()));
    }
}

/// Headless stand-in for a view-finder surface.
struct NullSink;

impl PreviewSink for NullSink {
    fn on_frame(&self, _frame: &CameraFrame) {}
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfiguration {
        album: args.album,
        pictures_root: args.output_root,
        jpeg_quality: args.quality,
        device_id: Some(args.device.display().to_string()),
        ..Default::default()
    };

    let provider = V4l2Camera::with_path(&args.device);
    let gate = Arc::new(V4l2PermissionGate::new(&args.device));

    let mut controller = match CameraSessionController::new(provider, gate, config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("failed to start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (outcome_tx, outcome_rx) = mpsc::channel();
    controller.set_delegate(Arc::new(ConsoleDelegate {
        outcomes: Mutex::new(outcome_tx),
    }));
    controller.set_preview_sink(Arc::new(NullSink));

    controller.handle_lifecycle(LifecycleEvent::Visible);
    if controller.state() != SessionState::Bound {
        eprintln!(
            "camera did not bind (state {:?}, permission {:?}); check the device node",
            controller.state(),
            controller.permission()
        );
        controller.handle_lifecycle(LifecycleEvent::Destroyed);
        return ExitCode::FAILURE;
    }

    std::thread::sleep(Duration::from_millis(args.warmup_ms));
    controller.capture_photo();

    let code = match outcome_rx.recv_timeout(Duration::from_secs(10)) {
        Ok(Outcome::Saved(photo)) => {
            println!("saved {}", photo.file_path.display());
            println!("sha256 {}", photo.checksum);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Failed(e)) => {
            eprintln!("capture failed: {}", e);
            ExitCode::FAILURE
        }
        Err(_) => {
            eprintln!("timed out waiting for the capture result");
            ExitCode::FAILURE
        }
    };

    let diagnostics = controller.diagnostics();
    log::info!(
        "preview frames delivered: {}, bytes written: {}",
        diagnostics.preview_frames,
        diagnostics.bytes_written
    );

    controller.handle_lifecycle(LifecycleEvent::Hidden);
    controller.handle_lifecycle(LifecycleEvent::Destroyed);
    code
}
