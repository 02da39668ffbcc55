// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::CameraError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Result type for camera backend operations
pub type CameraResult<T> = Result<T, CameraError>;

/// Outcome of a camera access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Device information from V4L2 capability
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// Name of the device (V4L2 card)
    pub card: String,
    /// Driver name (V4L2 driver)
    pub driver: String,
    /// Device path (e.g., /dev/video0)
    pub path: String,
    /// Bus the device hangs off (e.g., usb-0000:00:14.0-1)
    pub bus: String,
}

/// Represents a camera device
#[derive(Debug, Clone)]
pub struct CameraDescriptor {
    pub index: usize,
    pub name: String,
    pub path: String,
}

/// RGBA frame delivered by the capture thread
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels (width * 4 bytes per row)
    pub data: Arc<[u8]>,
    /// Capture timestamp for latency tracking
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from packed RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    /// RGB value of the pixel at (x, y), clamped to the frame
    pub fn pixel_rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 2 < self.data.len() {
            (self.data[idx], self.data[idx + 1], self.data[idx + 2])
        } else {
            (0, 0, 0)
        }
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Still photo written to disk by `take_photo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rgb_clamps_coordinates() {
        let frame = CameraFrame::from_rgba(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(frame.pixel_rgb(0, 0), (1, 2, 3));
        assert_eq!(frame.pixel_rgb(1, 0), (4, 5, 6));
        assert_eq!(frame.pixel_rgb(10, 10), (4, 5, 6));
    }

    #[test]
    fn test_pixel_rgb_on_empty_frame() {
        let frame = CameraFrame::from_rgba(0, 0, Vec::new());
        assert_eq!(frame.pixel_rgb(0, 0), (0, 0, 0));
    }
}
