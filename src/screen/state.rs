// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen state types

use crate::constants::{FILE_SCHEME, crop};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Visual mode of the capture screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureMode {
    /// Live camera preview with capture trigger
    CameraActive,
    /// No image, not in camera: "Take a Photo" / "Upload a Photo"
    #[default]
    IdleChooser,
    /// Image present: "Retake" / "Use Photo"
    Preview,
}

/// Opaque reference to an image, resolvable by the image renderer
///
/// File paths are carried with a `file://` prefix; other schemes are passed
/// through untouched. The empty locator means "no image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageLocator(String);

impl ImageLocator {
    /// The empty locator
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap an already formed locator string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a locator for a local file by prefixing the file scheme
    pub fn from_path(path: &Path) -> Self {
        Self(format!("{}{}", FILE_SCHEME, path.display()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local filesystem path this locator refers to, if any
    ///
    /// Accepts `file://` locators and bare absolute paths.
    pub fn to_path(&self) -> Option<PathBuf> {
        if self.0.is_empty() {
            return None;
        }
        if let Some(rest) = self.0.strip_prefix(FILE_SCHEME) {
            return Some(PathBuf::from(rest));
        }
        if self.0.starts_with('/') {
            return Some(PathBuf::from(&self.0));
        }
        None
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image shown in preview and forwarded on confirm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResult {
    pub locator: ImageLocator,
    pub width: u32,
    pub height: u32,
}

impl ImageResult {
    pub fn new(locator: ImageLocator, width: u32, height: u32) -> Self {
        Self {
            locator,
            width,
            height,
        }
    }

    /// Locator without known dimensions
    pub fn r#unsized(locator: ImageLocator) -> Self {
        Self::new(locator, 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.locator.is_empty()
    }

    /// Width / height, when both dimensions are known
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width > 0 && self.height > 0 {
            Some(self.width as f32 / self.height as f32)
        } else {
            None
        }
    }

    /// Reset to "no image"
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Rectangle cut out of a captured photo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel rectangle handed to the image transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Centered window at 30%–70% of each dimension
    pub fn centered(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            x: w * crop::START_FRACTION,
            y: h * crop::START_FRACTION,
            width: w * crop::SPAN_FRACTION,
            height: h * crop::SPAN_FRACTION,
        }
    }

    /// Round to whole pixels, clamped to an image of the given size
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelRect {
        let x = (self.x.round().max(0.0) as u32).min(image_width);
        let y = (self.y.round().max(0.0) as u32).min(image_height);
        let width = (self.width.round().max(0.0) as u32).min(image_width - x);
        let height = (self.height.round().max(0.0) as u32).min(image_height - y);
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Downstream screen the captured image is forwarded to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureTarget {
    /// Text scanning
    #[default]
    Scantext,
    /// Color detection
    ColorDetector,
    /// QR code scanning
    #[serde(rename = "QRScanner")]
    QrScanner,
}

impl FeatureTarget {
    pub const ALL: [FeatureTarget; 3] = [
        FeatureTarget::Scantext,
        FeatureTarget::ColorDetector,
        FeatureTarget::QrScanner,
    ];

    /// Route name of the destination screen
    pub fn screen_name(&self) -> &'static str {
        match self {
            FeatureTarget::Scantext => "Scantext",
            FeatureTarget::ColorDetector => "ColorDetector",
            FeatureTarget::QrScanner => "QRScanner",
        }
    }
}

impl fmt::Display for FeatureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.screen_name())
    }
}

impl FromStr for FeatureTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "scantext" | "text" => Ok(FeatureTarget::Scantext),
            "colordetector" | "color" => Ok(FeatureTarget::ColorDetector),
            "qrscanner" | "qr" => Ok(FeatureTarget::QrScanner),
            _ => Err(format!(
                "unknown feature '{}' (expected Scantext, ColorDetector or QRScanner)",
                s
            )),
        }
    }
}

/// Payload forwarded with a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    #[serde(rename = "imagePath")]
    pub image_path: ImageLocator,
}

/// Navigation request emitted on confirm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub screen: FeatureTarget,
    pub params: RouteParams,
}

impl Route {
    pub fn new(screen: FeatureTarget, image_path: ImageLocator) -> Self {
        Self {
            screen,
            params: RouteParams { image_path },
        }
    }
}

/// Identifies one mount of the screen
///
/// Asynchronous work started while mounted carries the token it was started
/// with; results whose token no longer matches are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenToken(pub(crate) u64);

impl ScreenToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_region_fractions() {
        let region = CropRegion::centered(1000, 2000);
        assert!((region.x - 300.0).abs() < 1e-9);
        assert!((region.y - 600.0).abs() < 1e-9);
        assert!((region.width - 400.0).abs() < 1e-9);
        assert!((region.height - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_crop_region_ends_at_seventy_percent() {
        for (w, h) in [(1, 1), (3, 7), (640, 480), (4032, 3024), (u32::MAX, 1)] {
            let region = CropRegion::centered(w, h);
            assert!(region.x + region.width <= w as f64);
            assert!(region.y + region.height <= h as f64);
            assert!((region.x + region.width - w as f64 * 0.7).abs() <= w as f64 * 1e-12);
        }
    }

    #[test]
    fn test_pixel_rect_clamped() {
        let rect = CropRegion::centered(1000, 2000).to_pixels(1000, 2000);
        assert_eq!(
            rect,
            PixelRect {
                x: 300,
                y: 600,
                width: 400,
                height: 800
            }
        );

        let tiny = CropRegion::centered(1, 1).to_pixels(1, 1);
        assert!(tiny.is_empty());
        assert!(tiny.x + tiny.width <= 1);
    }

    #[test]
    fn test_locator_round_trips_file_paths() {
        let locator = ImageLocator::from_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(locator.as_str(), "file:///tmp/photo.jpg");
        assert_eq!(locator.to_path(), Some(PathBuf::from("/tmp/photo.jpg")));

        assert_eq!(ImageLocator::empty().to_path(), None);
        assert_eq!(ImageLocator::new("content://media/1").to_path(), None);
        assert_eq!(
            ImageLocator::new("/home/user/a.png").to_path(),
            Some(PathBuf::from("/home/user/a.png"))
        );
    }

    #[test]
    fn test_aspect_ratio_requires_both_dimensions() {
        let locator = ImageLocator::new("file:///a.jpg");
        assert_eq!(ImageResult::r#unsized(locator.clone()).aspect_ratio(), None);
        assert_eq!(ImageResult::new(locator, 400, 800).aspect_ratio(), Some(0.5));
    }

    #[test]
    fn test_feature_target_parsing() {
        assert_eq!("QRScanner".parse(), Ok(FeatureTarget::QrScanner));
        assert_eq!("color-detector".parse(), Ok(FeatureTarget::ColorDetector));
        assert_eq!("scantext".parse(), Ok(FeatureTarget::Scantext));
        assert!("barcode".parse::<FeatureTarget>().is_err());
    }

    #[test]
    fn test_route_serializes_with_screen_names() {
        let route = Route::new(
            FeatureTarget::QrScanner,
            ImageLocator::new("file:///tmp/c.jpg"),
        );
        let json = serde_json::to_string(&route).unwrap();
        assert_eq!(
            json,
            r#"{"screen":"QRScanner","params":{"imagePath":"file:///tmp/c.jpg"}}"#
        );
    }
}
