// SPDX-License-Identifier: GPL-3.0-only

//! What each mode of the capture screen puts on screen

use super::state::{CaptureMode, ImageResult};
use super::{CaptureScreen, PendingWork};
use crate::constants::guide;

/// Interactive controls of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TakePhoto,
    UploadPhoto,
    Capture,
    Retake,
    UsePhoto,
}

/// Fixed capture guide drawn over the live preview, in viewport percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGuide {
    pub top_percent: u16,
    pub height_percent: u16,
    pub left_percent: u16,
    pub width_percent: u16,
}

impl Default for OverlayGuide {
    fn default() -> Self {
        Self {
            top_percent: guide::TOP_PERCENT,
            height_percent: guide::HEIGHT_PERCENT,
            left_percent: guide::LEFT_PERCENT,
            width_percent: guide::WIDTH_PERCENT,
        }
    }
}

impl OverlayGuide {
    /// Guide rectangle (x, y, width, height) inside a viewport of the given size
    pub fn rect_in(&self, width: u16, height: u16) -> (u16, u16, u16, u16) {
        let scale = |extent: u16, percent: u16| (extent as u32 * percent as u32 / 100) as u16;
        (
            scale(width, self.left_percent),
            scale(height, self.top_percent),
            scale(width, self.width_percent),
            scale(height, self.height_percent),
        )
    }

    /// Space left below the guide, in percent
    pub fn bottom_percent(&self) -> u16 {
        100u16.saturating_sub(self.top_percent + self.height_percent)
    }

    /// Space left right of the guide, in percent
    pub fn right_percent(&self) -> u16 {
        100u16.saturating_sub(self.left_percent + self.width_percent)
    }
}

/// Rendering of the screen for its current state
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenLayout {
    /// Static notice only
    CameraUnavailable,
    /// Live preview, overlay guide and capture trigger
    CameraActive { guide: OverlayGuide, capturing: bool },
    /// "Take a Photo" and "Upload a Photo"
    Chooser { picking: bool },
    /// The image with its aspect ratio when known
    Preview {
        image: ImageResult,
        aspect_ratio: Option<f32>,
    },
}

impl ScreenLayout {
    pub fn for_screen(screen: &CaptureScreen) -> Self {
        if !screen.camera_available() {
            return ScreenLayout::CameraUnavailable;
        }
        match screen.mode() {
            CaptureMode::CameraActive => ScreenLayout::CameraActive {
                guide: OverlayGuide::default(),
                capturing: screen.pending() == Some(PendingWork::Capture),
            },
            CaptureMode::IdleChooser => ScreenLayout::Chooser {
                picking: screen.pending() == Some(PendingWork::Upload),
            },
            CaptureMode::Preview => {
                let image = screen.image().clone();
                ScreenLayout::Preview {
                    aspect_ratio: image.aspect_ratio(),
                    image,
                }
            }
        }
    }

    /// Controls rendered in this layout
    pub fn controls(&self) -> &'static [Control] {
        match self {
            ScreenLayout::CameraUnavailable => &[],
            ScreenLayout::CameraActive { .. } => &[Control::Capture],
            ScreenLayout::Chooser { .. } => &[Control::TakePhoto, Control::UploadPhoto],
            ScreenLayout::Preview { .. } => &[Control::Retake, Control::UsePhoto],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_rect() {
        let guide = OverlayGuide::default();
        assert_eq!(guide.rect_in(200, 100), (20, 30, 160, 40));
        assert_eq!(guide.bottom_percent(), 30);
        assert_eq!(guide.right_percent(), 10);
    }

    #[test]
    fn test_controls_per_layout() {
        assert!(ScreenLayout::CameraUnavailable.controls().is_empty());
        assert_eq!(
            ScreenLayout::Chooser { picking: false }.controls(),
            &[Control::TakePhoto, Control::UploadPhoto]
        );
        assert_eq!(
            ScreenLayout::CameraActive {
                guide: OverlayGuide::default(),
                capturing: false
            }
            .controls(),
            &[Control::Capture]
        );
    }
}
