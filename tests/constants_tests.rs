// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use capture_screen::constants::{PHOTO_EXTENSIONS, crop, guide, phrases, timing};

#[test]
fn test_crop_window_is_centered() {
    // The window leaves the same margin on both sides of each axis
    let trailing = 1.0 - crop::START_FRACTION - crop::SPAN_FRACTION;
    assert!((trailing - crop::START_FRACTION).abs() < 1e-9);
}

#[test]
fn test_guide_is_horizontally_centered() {
    assert_eq!(
        guide::LEFT_PERCENT,
        100 - guide::LEFT_PERCENT - guide::WIDTH_PERCENT
    );
}

#[test]
fn test_guide_differs_from_crop_window() {
    // The guide is a visual hint, wider than the pixels actually kept
    assert!(guide::WIDTH_PERCENT as f64 / 100.0 > crop::SPAN_FRACTION);
}

#[test]
fn test_phrases() {
    assert_eq!(phrases::TAKE_PHOTO, "Take a photo");
    assert_eq!(phrases::UPLOAD_PHOTO, "Upload a photo");
    assert_eq!(phrases::RETAKE, "Retake");
    assert_eq!(phrases::USE_PHOTO, "Use photo");
}

#[test]
fn test_photo_extensions() {
    assert!(PHOTO_EXTENSIONS.contains(&"jpg"));
    assert!(PHOTO_EXTENSIONS.contains(&"png"));
    // Extensions are given without a leading dot
    assert!(PHOTO_EXTENSIONS.iter().all(|ext| !ext.starts_with('.')));
}

#[test]
fn test_timing() {
    assert!(timing::CAMERA_WARMUP < timing::FIRST_FRAME_TIMEOUT);
    assert!(!timing::PREVIEW_POLL.is_zero());
}
