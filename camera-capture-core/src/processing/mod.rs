pub mod frame_latch;
pub mod pixel_format;
