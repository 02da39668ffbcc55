// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion for V4L2 capture buffers

use image::ImageFormat;

/// Convert packed YUYV 4:2:2 to RGBA
///
/// YUYV: Y0 U Y1 V - two pixels share chroma. Rows are assumed unpadded.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0];
        let u = chunk[1];
        let y1 = chunk[2];
        let v = chunk[3];

        for y in [y0, y1] {
            let (r, g, b) = yuv_to_rgb(y, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }

        if rgba.len() >= pixel_count * 4 {
            break;
        }
    }

    rgba.truncate(pixel_count * 4);
    rgba
}

/// Decode one MJPEG buffer to RGBA, returning (pixels, width, height)
pub fn mjpeg_to_rgba(data: &[u8]) -> Option<(Vec<u8>, u32, u32)> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg).ok()?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some((rgba.into_raw(), width, height))
}

/// Convert YUV (BT.601) to RGB
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_gray() {
        // Neutral chroma yields gray pixels equal to luma
        let data = [100, 128, 200, 128];
        let rgba = yuyv_to_rgba(&data, 2, 1);
        assert_eq!(rgba, vec![100, 100, 100, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_yuyv_short_buffer() {
        let rgba = yuyv_to_rgba(&[0, 128], 2, 1);
        assert!(rgba.is_empty());
    }

    #[test]
    fn test_mjpeg_rejects_garbage() {
        assert!(mjpeg_to_rgba(&[0, 1, 2, 3]).is_none());
    }
}
