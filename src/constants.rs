// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Crop window applied to every captured photo
///
/// The window is a fixed fraction of the captured image's pixel dimensions,
/// recomputed per capture from the size reported by the image service.
pub mod crop {
    /// Start of the window on each axis (fraction of the dimension)
    pub const START_FRACTION: f64 = 0.3;
    /// Extent of the window on each axis (fraction of the dimension)
    pub const SPAN_FRACTION: f64 = 0.4;
}

/// Visual capture guide drawn over the live camera preview
///
/// Percentages of the viewport. These are independent of [`crop`]: the guide
/// is never bound to the preview's real pixel dimensions.
pub mod guide {
    pub const TOP_PERCENT: u16 = 30;
    pub const HEIGHT_PERCENT: u16 = 40;
    pub const LEFT_PERCENT: u16 = 10;
    pub const WIDTH_PERCENT: u16 = 80;
    /// Border width in logical pixels (GUI)
    pub const BORDER_WIDTH: f32 = 2.0;
}

/// Phrases spoken by the announcer
pub mod phrases {
    pub const TAKE_PHOTO: &str = "Take a photo";
    pub const UPLOAD_PHOTO: &str = "Upload a photo";
    pub const RETAKE: &str = "Retake";
    pub const USE_PHOTO: &str = "Use photo";
}

/// Speech defaults
pub mod speech {
    /// Default synthesis language (BCP 47)
    pub const DEFAULT_LANGUAGE: &str = "en-US";
    /// Default speech-dispatcher voice type
    pub const DEFAULT_VOICE: &str = "male1";
    /// speech-dispatcher client binary
    pub const SPD_SAY: &str = "spd-say";
}

/// URI scheme prefixed to file paths to form image locators
pub const FILE_SCHEME: &str = "file://";

/// Extensions offered by the photo library picker
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

/// JPEG quality for captured and cropped photos
pub const JPEG_QUALITY: u8 = 92;

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Live preview refresh interval (~30fps)
    pub const PREVIEW_POLL: Duration = Duration::from_millis(33);
    /// Camera warm-up before a headless capture uses a frame
    pub const CAMERA_WARMUP: Duration = Duration::from_millis(500);
    /// Give up waiting for a first frame after this long
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);
    /// Cached captures older than this are pruned at startup
    pub const CACHE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
}

/// V4L2 capture settings
pub mod v4l2 {
    /// Requested capture width
    pub const CAPTURE_WIDTH: u32 = 1280;
    /// Requested capture height
    pub const CAPTURE_HEIGHT: u32 = 720;
    /// Number of mmap buffers in the capture stream
    pub const BUFFER_COUNT: u32 = 4;
}

/// Downstream feature analysis tuning
pub mod analysis {
    /// QR frames are downscaled so their larger side is at most this
    pub const QR_MAX_DIMENSION: u32 = 1024;
    /// Color detection samples at most this many pixels per side
    pub const COLOR_SAMPLE_DIMENSION: u32 = 64;
    /// Tesseract language
    pub const OCR_LANGUAGE: &str = "eng";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_window_stays_inside_image() {
        assert!(crop::START_FRACTION + crop::SPAN_FRACTION <= 1.0);
    }

    #[test]
    fn test_guide_stays_inside_viewport() {
        assert!(guide::TOP_PERCENT + guide::HEIGHT_PERCENT <= 100);
        assert!(guide::LEFT_PERCENT + guide::WIDTH_PERCENT <= 100);
    }
}
