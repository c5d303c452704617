use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::models::camera_models::{CameraFrame, CaptureHandle, SessionDiagnostics};
use crate::models::config::SessionConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::{LifecycleEvent, PermissionState, SessionState};
use crate::storage::media_library::MediaLibrary;
use crate::traits::camera_provider::{CameraProvider, PreviewFrameCallback};
use crate::traits::camera_session::CameraSession;
use crate::traits::permission_gate::PermissionGate;
use crate::traits::preview_sink::PreviewSink;
use crate::traits::session_delegate::SessionDelegate;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct ControllerShared {
    state: SessionState,
    permission: PermissionState,
    visible: bool,
    awaiting_permission: bool,
    handle: Option<CaptureHandle>,
    diagnostics: SessionDiagnostics,
}

impl ControllerShared {
    fn new() -> Self {
        Self {
            state: SessionState::Unbound,
            permission: PermissionState::NotGranted,
            visible: false,
            awaiting_permission: false,
            handle: None,
            diagnostics: SessionDiagnostics::default(),
        }
    }
}

enum WorkerJob {
    SavePhoto(CaptureJob),
    Shutdown,
}

struct CaptureJob {
    frame: CameraFrame,
    library: MediaLibrary,
    shared: Arc<Mutex<ControllerShared>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
}

/// Permission-gated camera session controller.
///
/// Generic over the platform camera stack via the `CameraProvider` trait.
/// Lifecycle and permission outcomes are delivered externally; the controller
/// runs the state machine, wires the preview sink, and hands capture writes
/// to its own worker thread:
///
/// ```text
/// [Visible] → permission? → [bind: preview sink + capture handle]
/// [capture_photo] → still frame → [worker: JPEG → MediaLibrary] → delegate
/// ```
///
/// The capture worker is owned by the controller: spawned at construction,
/// shut down on `Destroyed` and again on `Drop`, so every exit path releases
/// it.
pub struct CameraSessionController<P: CameraProvider> {
    provider: P,
    permissions: Arc<dyn PermissionGate>,
    library: MediaLibrary,
    config: SessionConfiguration,
    shared: Arc<Mutex<ControllerShared>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    preview_sink: Option<Arc<dyn PreviewSink>>,
    worker_tx: Option<mpsc::Sender<WorkerJob>>,
    worker_handle: Option<thread::JoinHandle<()>>,
}

impl<P: CameraProvider> CameraSessionController<P> {
    pub fn new(
        provider: P,
        permissions: Arc<dyn PermissionGate>,
        config: SessionConfiguration,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::Configuration)?;
        let library = MediaLibrary::new(&config)?;

        let (worker_tx, worker_rx) = mpsc::channel();
        let worker_handle = thread::Builder::new()
            .name("camera-capture-worker".into())
            .spawn(move || worker_loop(worker_rx))
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn capture worker: {}", e)))?;

        Ok(Self {
            provider,
            permissions,
            library,
            config,
            shared: Arc::new(Mutex::new(ControllerShared::new())),
            delegate: None,
            preview_sink: None,
            worker_tx: Some(worker_tx),
            worker_handle: Some(worker_handle),
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_preview_sink(&mut self, sink: Arc<dyn PreviewSink>) {
        self.preview_sink = Some(sink);
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Last permission outcome observed, not a fresh platform query.
    pub fn permission(&self) -> PermissionState {
        self.shared.lock().permission
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.shared.lock().diagnostics.clone()
    }

    pub fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Visible => self.on_visible(),
            LifecycleEvent::Hidden => self.teardown(),
            LifecycleEvent::Destroyed => {
                self.teardown();
                self.shutdown_worker();
            }
        }
    }

    /// Externally-delivered permission outcome (the shell's permission
    /// dialog callback). Binds the session if the screen is still visible
    /// and unbound.
    pub fn handle_permission_result(&mut self, result: PermissionState) {
        {
            let mut shared = self.shared.lock();
            shared.permission = result;
            shared.awaiting_permission = false;
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_permission_changed(result);
        }

        let should_bind = {
            let shared = self.shared.lock();
            result.is_granted() && shared.visible && shared.state.is_unbound()
        };
        if should_bind {
            self.bind_session();
        }
    }

    /// Request a still capture.
    ///
    /// A no-op without a bound capture handle. The frame is grabbed here;
    /// encoding and the media-store write happen on the capture worker, which
    /// reports the outcome through the delegate.
    pub fn capture_photo(&mut self) {
        {
            let mut shared = self.shared.lock();
            if !shared.state.is_bound() || shared.handle.is_none() {
                log::warn!("capture requested without a bound session, ignoring");
                return;
            }
            shared.diagnostics.capture_attempts += 1;
        }
        self.set_state(SessionState::Capturing);

        let frame = match self.provider.still_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("still frame acquisition failed: {}", e);
                self.shared.lock().diagnostics.capture_failures += 1;
                if let Some(ref delegate) = self.delegate {
                    delegate.on_capture_error(&e);
                }
                self.set_state(SessionState::Bound);
                return;
            }
        };

        let job = CaptureJob {
            frame,
            library: self.library.clone(),
            shared: Arc::clone(&self.shared),
            delegate: self.delegate.clone(),
        };
        let sent = self
            .worker_tx
            .as_ref()
            .map(|tx| tx.send(WorkerJob::SavePhoto(job)).is_ok())
            .unwrap_or(false);
        if !sent {
            log::error!("capture worker is gone, dropping capture request");
            self.set_state(SessionState::Bound);
        }
    }

    fn on_visible(&mut self) {
        {
            let mut shared = self.shared.lock();
            shared.visible = true;
            if !shared.state.is_unbound() {
                log::debug!("visible while already {:?}, ignoring", shared.state);
                return;
            }
        }

        let status = self.permissions.status();
        self.shared.lock().permission = status;
        match status {
            PermissionState::Granted => self.bind_session(),
            PermissionState::NotGranted => self.request_permission(),
        }
    }

    fn request_permission(&mut self) {
        {
            let mut shared = self.shared.lock();
            if shared.awaiting_permission {
                return;
            }
            shared.awaiting_permission = true;
        }
        log::info!("camera permission not granted, requesting");

        // The gate callback only records the outcome; binding happens when
        // the shell forwards the result via `handle_permission_result`.
        let shared = Arc::clone(&self.shared);
        self.permissions.request(Arc::new(move |result| {
            log::debug!("permission request resolved: {:?}", result);
            let mut shared = shared.lock();
            shared.permission = result;
            shared.awaiting_permission = false;
        }));
    }

    fn bind_session(&mut self) {
        {
            let mut shared = self.shared.lock();
            if !shared.visible || !shared.state.is_unbound() {
                return;
            }
            shared.diagnostics.bind_attempts += 1;
        }
        self.set_state(SessionState::Binding);

        // Clear any previous binding before wiring a new one.
        self.provider.unbind();

        let sink = if self.config.enable_preview {
            self.preview_sink.clone()
        } else {
            None
        };
        let shared = Arc::clone(&self.shared);
        let callback: PreviewFrameCallback = Arc::new(move |frame| {
            shared.lock().diagnostics.preview_frames += 1;
            if let Some(ref sink) = sink {
                sink.on_frame(frame);
            }
        });

        match self.provider.bind(&self.config, callback) {
            Ok(()) => {
                let handle = CaptureHandle::new(self.provider.device_info());
                self.shared.lock().handle = Some(handle);
                self.set_state(SessionState::Bound);
            }
            Err(e) => {
                // Logged only; bind failures are silent to the user.
                log::error!("camera bind failed: {}", e);
                self.provider.unbind();
                self.shared.lock().handle = None;
                self.set_state(SessionState::Unbound);
            }
        }
    }

    fn teardown(&mut self) {
        let needs_transition = {
            let mut shared = self.shared.lock();
            shared.visible = false;
            shared.handle = None;
            !shared.state.is_unbound()
        };
        self.provider.unbind();
        if needs_transition {
            self.set_state(SessionState::Unbound);
        }
    }

    fn shutdown_worker(&mut self) {
        if let Some(tx) = self.worker_tx.take() {
            let _ = tx.send(WorkerJob::Shutdown);
        }
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }

    fn set_state(&self, new_state: SessionState) {
        self.shared.lock().state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }
}

impl<P: CameraProvider> CameraSession for CameraSessionController<P> {
    fn state(&self) -> SessionState {
        CameraSessionController::state(self)
    }

    fn diagnostics(&self) -> SessionDiagnostics {
        CameraSessionController::diagnostics(self)
    }

    fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        CameraSessionController::handle_lifecycle(self, event)
    }

    fn handle_permission_result(&mut self, result: PermissionState) {
        CameraSessionController::handle_permission_result(self, result)
    }

    fn capture_photo(&mut self) {
        CameraSessionController::capture_photo(self)
    }
}

impl<P: CameraProvider> Drop for CameraSessionController<P> {
    fn drop(&mut self) {
        self.provider.unbind();
        self.shutdown_worker();
    }
}

fn worker_loop(rx: mpsc::Receiver<WorkerJob>) {
    while let Ok(job) = rx.recv() {
        match job {
            WorkerJob::Shutdown => break,
            WorkerJob::SavePhoto(job) => run_capture_job(job),
        }
    }
}

fn run_capture_job(job: CaptureJob) {
    let outcome = job.library.save_photo(&job.frame);

    // A teardown may race a capture in flight; the finished write is still
    // reported, but session state is only restored while the session lives.
    let notify_bound = {
        let mut shared = job.shared.lock();
        match &outcome {
            Ok(photo) => {
                shared.diagnostics.photos_saved += 1;
                shared.diagnostics.bytes_written += photo.metadata.file_size;
            }
            Err(_) => shared.diagnostics.capture_failures += 1,
        }
        if shared.state.is_capturing() {
            shared.state = SessionState::Bound;
            true
        } else {
            false
        }
    };

    match &outcome {
        Ok(photo) => log::info!("photo saved to {}", photo.file_path.display()),
        Err(e) => log::error!("photo capture failed: {}", e),
    }

    if let Some(ref delegate) = job.delegate {
        if notify_bound {
            delegate.on_state_changed(SessionState::Bound);
        }
        match outcome {
            Ok(photo) => delegate.on_photo_saved(&photo),
            Err(e) => delegate.on_capture_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::models::camera_models::{CameraFacing, CameraSource, PixelFormat};
    use crate::models::error::BindError;
    use crate::models::photo::SavedPhoto;

    #[derive(Default)]
    struct ProviderInner {
        calls: Vec<&'static str>,
        callback: Option<PreviewFrameCallback>,
    }

    struct FakeProvider {
        inner: Arc<Mutex<ProviderInner>>,
        fail_bind: bool,
        fail_still: bool,
    }

    impl FakeProvider {
        fn new() -> (Self, Arc<Mutex<ProviderInner>>) {
            let inner = Arc::new(Mutex::new(ProviderInner::default()));
            (
                Self {
                    inner: Arc::clone(&inner),
                    fail_bind: false,
                    fail_still: false,
                },
                inner,
            )
        }
    }

    impl CameraProvider for FakeProvider {
        fn is_available(&self) -> bool {
            true
        }

        fn bind(
            &mut self,
            _config: &SessionConfiguration,
            callback: PreviewFrameCallback,
        ) -> Result<(), BindError> {
            let mut inner = self.inner.lock();
            inner.calls.push("bind");
            if self.fail_bind {
                return Err(BindError::CameraNotAvailable);
            }
            inner.callback = Some(callback);
            Ok(())
        }

        fn unbind(&mut self) {
            let mut inner = self.inner.lock();
            inner.calls.push("unbind");
            inner.callback = None;
        }

        fn still_frame(&mut self) -> Result<CameraFrame, CaptureError> {
            self.inner.lock().calls.push("still");
            if self.fail_still {
                Err(CaptureError::FrameAcquisition("simulated failure".into()))
            } else {
                Ok(test_frame())
            }
        }

        fn device_info(&self) -> CameraSource {
            CameraSource {
                id: "fake0".into(),
                name: "fake camera".into(),
                facing: CameraFacing::Back,
                is_default: true,
            }
        }
    }

    struct FakeGate {
        status: Mutex<PermissionState>,
        requests: Mutex<u32>,
    }

    impl FakeGate {
        fn new(status: PermissionState) -> Arc<Self> {
            Arc::new(Self {
                status: Mutex::new(status),
                requests: Mutex::new(0),
            })
        }

        fn request_count(&self) -> u32 {
            *self.requests.lock()
        }
    }

    impl PermissionGate for FakeGate {
        fn status(&self) -> PermissionState {
            *self.status.lock()
        }

        fn request(&self, on_result: crate::traits::permission_gate::PermissionCallback) {
            *self.requests.lock() += 1;
            on_result(*self.status.lock());
        }
    }

    #[derive(Default)]
    struct Events {
        states: Vec<SessionState>,
        permissions: Vec<PermissionState>,
        photos: Vec<SavedPhoto>,
        errors: Vec<CaptureError>,
    }

    struct RecordingDelegate {
        events: Arc<Mutex<Events>>,
    }

    impl RecordingDelegate {
        fn new() -> (Arc<Self>, Arc<Mutex<Events>>) {
            let events = Arc::new(Mutex::new(Events::default()));
            (
                Arc::new(Self {
                    events: Arc::clone(&events),
                }),
                events,
            )
        }
    }

    impl SessionDelegate for RecordingDelegate {
        fn on_state_changed(&self, state: SessionState) {
            self.events.lock().states.push(state);
        }

        fn on_permission_changed(&self, state: PermissionState) {
            self.events.lock().permissions.push(state);
        }

        fn on_photo_saved(&self, photo: &SavedPhoto) {
            self.events.lock().photos.push(photo.clone());
        }

        fn on_capture_error(&self, error: &CaptureError) {
            self.events.lock().errors.push(error.clone());
        }
    }

    struct CountingSink {
        frames: Mutex<u64>,
    }

    impl PreviewSink for CountingSink {
        fn on_frame(&self, _frame: &CameraFrame) {
            *self.frames.lock() += 1;
        }
    }

    fn test_frame() -> CameraFrame {
        CameraFrame {
            data: vec![180u8; 2 * 2 * 3],
            width: 2,
            height: 2,
            format: PixelFormat::Rgb8,
            sequence: 1,
        }
    }

    fn test_config(album: &str) -> SessionConfiguration {
        SessionConfiguration {
            album: album.into(),
            pictures_root: Some(std::env::temp_dir().join("camera_capture_test_controller")),
            ..Default::default()
        }
    }

    fn wait_until(mut pred: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred() {
            assert!(Instant::now() < deadline, "timed out waiting for condition");
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn controller_with(
        provider: FakeProvider,
        gate: Arc<FakeGate>,
        album: &str,
    ) -> (
        CameraSessionController<FakeProvider>,
        Arc<Mutex<Events>>,
    ) {
        let mut controller =
            CameraSessionController::new(provider, gate, test_config(album)).unwrap();
        let (delegate, events) = RecordingDelegate::new();
        controller.set_delegate(delegate);
        (controller, events)
    }

    #[test]
    fn binds_once_per_visible_session() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, _) = controller_with(provider, gate, "bind_once");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        assert_eq!(controller.state(), SessionState::Bound);

        // A duplicate visible event must not rebind.
        controller.handle_lifecycle(LifecycleEvent::Visible);

        let binds = inner.lock().calls.iter().filter(|c| **c == "bind").count();
        assert_eq!(binds, 1);
        assert_eq!(controller.diagnostics().bind_attempts, 1);
    }

    #[test]
    fn no_bind_until_grant_is_observed() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::NotGranted);
        let (mut controller, events) = controller_with(provider, Arc::clone(&gate), "gated");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        assert_eq!(controller.state(), SessionState::Unbound);
        assert_eq!(gate.request_count(), 1);
        assert!(!inner.lock().calls.contains(&"bind"));

        controller.handle_permission_result(PermissionState::Granted);
        assert_eq!(controller.state(), SessionState::Bound);
        assert_eq!(inner.lock().calls.iter().filter(|c| **c == "bind").count(), 1);
        assert_eq!(events.lock().permissions, vec![PermissionState::Granted]);
    }

    #[test]
    fn denied_result_leaves_session_unbound() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::NotGranted);
        let (mut controller, _) = controller_with(provider, gate, "denied");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        controller.handle_permission_result(PermissionState::NotGranted);

        assert_eq!(controller.state(), SessionState::Unbound);
        assert!(!inner.lock().calls.contains(&"bind"));
    }

    #[test]
    fn capture_without_handle_is_a_noop() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, events) = controller_with(provider, gate, "noop");

        // Never made visible, so nothing is bound.
        controller.capture_photo();

        assert_eq!(controller.state(), SessionState::Unbound);
        assert!(!inner.lock().calls.contains(&"still"));
        let events = events.lock();
        assert!(events.photos.is_empty());
        assert!(events.errors.is_empty());
    }

    #[test]
    fn rebind_clears_previous_binding_first() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, _) = controller_with(provider, gate, "rebind");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        controller.handle_lifecycle(LifecycleEvent::Hidden);
        assert_eq!(controller.state(), SessionState::Unbound);

        controller.handle_lifecycle(LifecycleEvent::Visible);
        assert_eq!(controller.state(), SessionState::Bound);

        let calls = inner.lock().calls.clone();
        assert_eq!(calls.iter().filter(|c| **c == "bind").count(), 2);
        // Every bind is preceded by a defensive unbind.
        for (i, call) in calls.iter().enumerate() {
            if *call == "bind" {
                assert_eq!(calls[i - 1], "unbind");
            }
        }
    }

    #[test]
    fn preview_frames_reach_the_sink() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, _) = controller_with(provider, gate, "preview");
        let sink = Arc::new(CountingSink {
            frames: Mutex::new(0),
        });
        controller.set_preview_sink(Arc::clone(&sink) as Arc<dyn PreviewSink>);

        controller.handle_lifecycle(LifecycleEvent::Visible);

        let callback = inner.lock().callback.clone().unwrap();
        callback(&test_frame());
        callback(&test_frame());

        assert_eq!(*sink.frames.lock(), 2);
        assert_eq!(controller.diagnostics().preview_frames, 2);
    }

    #[test]
    fn bind_failure_returns_to_unbound_without_user_error() {
        let (mut provider, _) = FakeProvider::new();
        provider.fail_bind = true;
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, events) = controller_with(provider, gate, "bind_fail");

        controller.handle_lifecycle(LifecycleEvent::Visible);

        assert_eq!(controller.state(), SessionState::Unbound);
        let events = events.lock();
        // Bind errors never surface through the capture-error callback.
        assert!(events.errors.is_empty());
        assert_eq!(
            events.states,
            vec![SessionState::Binding, SessionState::Unbound]
        );
    }

    #[test]
    fn capture_success_reports_the_saved_photo() {
        let (provider, _) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, events) = controller_with(provider, gate, "capture_ok");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        controller.capture_photo();

        wait_until(|| !events.lock().photos.is_empty());
        wait_until(|| controller.state() == SessionState::Bound);

        let events = events.lock();
        assert!(events.errors.is_empty());
        let photo = &events.photos[0];
        assert!(photo.file_path.exists());
        assert_eq!(photo.metadata.width, 2);
        assert_eq!(photo.metadata.checksum, photo.checksum);
        assert_eq!(controller.diagnostics().photos_saved, 1);
        assert!(controller.diagnostics().bytes_written > 0);
    }

    #[test]
    fn capture_failure_reports_the_error_and_no_photo() {
        let (mut provider, _) = FakeProvider::new();
        provider.fail_still = true;
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, events) = controller_with(provider, gate, "capture_fail");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        controller.capture_photo();

        assert_eq!(controller.state(), SessionState::Bound);
        let events = events.lock();
        assert!(events.photos.is_empty());
        assert_eq!(
            events.errors,
            vec![CaptureError::FrameAcquisition("simulated failure".into())]
        );
        assert_eq!(controller.diagnostics().capture_failures, 1);
    }

    #[test]
    fn destroyed_tears_down_and_stops_the_worker() {
        let (provider, inner) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (mut controller, _) = controller_with(provider, gate, "destroy");

        controller.handle_lifecycle(LifecycleEvent::Visible);
        controller.handle_lifecycle(LifecycleEvent::Destroyed);

        assert_eq!(controller.state(), SessionState::Unbound);
        assert!(inner.lock().calls.contains(&"unbind"));

        // Capture after destruction stays a no-op.
        controller.capture_photo();
        assert!(!inner.lock().calls.contains(&"still"));
    }

    #[test]
    fn drives_through_the_session_facade() {
        let (provider, _) = FakeProvider::new();
        let gate = FakeGate::new(PermissionState::Granted);
        let (controller, events) = controller_with(provider, gate, "facade");
        let mut session: Box<dyn CameraSession> = Box::new(controller);

        session.handle_lifecycle(LifecycleEvent::Visible);
        assert_eq!(session.state(), SessionState::Bound);

        session.capture_photo();
        wait_until(|| !events.lock().photos.is_empty());
        assert_eq!(session.diagnostics().photos_saved, 1);

        session.handle_lifecycle(LifecycleEvent::Destroyed);
        assert_eq!(session.state(), SessionState::Unbound);
    }
}
