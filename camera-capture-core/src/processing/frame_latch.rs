use crate::models::camera_models::CameraFrame;

/// Single-slot cell holding the most recent camera frame.
///
/// Streaming backends overwrite the slot on every preview frame and serve
/// still captures from it. Wrap in `Arc<parking_lot::Mutex<FrameLatch>>` for
/// cross-thread access.
///
/// Overwrite behavior: `store` drops the previous frame.
#[derive(Debug, Default)]
pub struct FrameLatch {
    frame: Option<CameraFrame>,
}

impl FrameLatch {
    pub fn new() -> Self {
        Self { frame: None }
    }

    /// Replace the latched frame with `frame`.
    pub fn store(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
    }

    /// Clone of the most recent frame, if any.
    pub fn latest(&self) -> Option<CameraFrame> {
        self.frame.clone()
    }

    /// Remove and return the latched frame.
    pub fn take(&mut self) -> Option<CameraFrame> {
        self.frame.take()
    }

    /// Drop the latched frame.
    pub fn clear(&mut self) {
        self.frame = None;
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera_models::PixelFormat;

    fn frame(sequence: u64) -> CameraFrame {
        CameraFrame {
            data: vec![sequence as u8; 4],
            width: 2,
            height: 1,
            format: PixelFormat::Yuyv,
            sequence,
        }
    }

    #[test]
    fn starts_empty() {
        let latch = FrameLatch::new();
        assert!(!latch.has_frame());
        assert_eq!(latch.latest(), None);
    }

    #[test]
    fn store_overwrites_previous_frame() {
        let mut latch = FrameLatch::new();
        latch.store(frame(1));
        latch.store(frame(2));

        assert_eq!(latch.latest().map(|f| f.sequence), Some(2));
    }

    #[test]
    fn latest_leaves_frame_in_place() {
        let mut latch = FrameLatch::new();
        latch.store(frame(7));

        assert_eq!(latch.latest().map(|f| f.sequence), Some(7));
        assert!(latch.has_frame());
    }

    #[test]
    fn take_empties_the_latch() {
        let mut latch = FrameLatch::new();
        latch.store(frame(3));

        assert_eq!(latch.take().map(|f| f.sequence), Some(3));
        assert!(!latch.has_frame());
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn clear_drops_frame() {
        let mut latch = FrameLatch::new();
        latch.store(frame(9));
        latch.clear();

        assert!(!latch.has_frame());
    }
}
