// SPDX-License-Identifier: MPL-2.0

//! Frame conversion helpers for the live preview

use crate::backends::camera::CameraFrame;
use cosmic::widget::image::Handle;

/// Mirror packed RGBA rows horizontally
pub fn mirror_rgba(data: &[u8], width: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    if row_bytes == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(data.len());
    for row in data.chunks_exact(row_bytes) {
        for pixel in row.chunks_exact(4).rev() {
            out.extend_from_slice(pixel);
        }
    }
    out
}

/// Image handle for a preview frame, optionally mirrored (selfie mode)
pub fn frame_to_handle(frame: &CameraFrame, mirror: bool) -> Handle {
    let pixels = if mirror {
        mirror_rgba(&frame.data, frame.width)
    } else {
        frame.data.to_vec()
    };
    Handle::from_rgba(frame.width, frame.height, pixels)
}
