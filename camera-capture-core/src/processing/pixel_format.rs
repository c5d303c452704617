/// Pixel format conversion helpers.
///
/// Cameras commonly deliver packed YUV 4:2:2 (YUYV); the media writer wants
/// RGB for JPEG encoding. Conversion uses the BT.601 integer approximation:
///
/// ```text
/// c = y - 16,  d = u - 128,  e = v - 128
/// r = clamp((298c + 409e + 128) >> 8)
/// g = clamp((298c - 100d - 208e + 128) >> 8)
/// b = clamp((298c + 516d + 128) >> 8)
/// ```
/// Bytes per YUYV pixel pair: Y0 U Y1 V.
const YUYV_BYTES_PER_PAIR: usize = 4;

/// Expected buffer size in bytes for a YUYV frame.
pub fn yuyv_frame_size(width: u32, height: u32) -> usize {
    width as usize * height as usize * 2
}

/// Expected buffer size in bytes for an RGB8 frame.
pub fn rgb_frame_size(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Convert a packed YUYV buffer to tightly-packed RGB8.
///
/// `width` must be even (YUYV stores two pixels per 4-byte group).
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, String> {
    if width % 2 != 0 {
        return Err(format!("yuyv width must be even, got {}", width));
    }
    let expected = yuyv_frame_size(width, height);
    if data.len() < expected {
        return Err(format!(
            "yuyv buffer too small: {} bytes for {}x{} (expected {})",
            data.len(),
            width,
            height,
            expected
        ));
    }

    let mut rgb = Vec::with_capacity(rgb_frame_size(width, height));
    for group in data[..expected].chunks_exact(YUYV_BYTES_PER_PAIR) {
        let (y0, u, y1, v) = (group[0], group[1], group[2], group[3]);
        push_rgb(&mut rgb, y0, u, v);
        push_rgb(&mut rgb, y1, u, v);
    }
    Ok(rgb)
}

fn push_rgb(out: &mut Vec<u8>, y: u8, u: u8, v: u8) {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    out.push(clamp((298 * c + 409 * e + 128) >> 8));
    out.push(clamp((298 * c - 100 * d - 208 * e + 128) >> 8));
    out.push(clamp((298 * c + 516 * d + 128) >> 8));
}

fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
