// SPDX-License-Identifier: GPL-3.0-only

//! Feature screens receiving the captured photo
//!
//! - [`text`]: text scanning (tesseract)
//! - [`color`]: dominant color detection
//! - [`qr`]: QR code scanning

pub mod color;
pub mod qr;
pub mod text;

pub use color::ColorReport;

use crate::errors::{AppError, ImageError};
use crate::screen::{FeatureTarget, ImageLocator, Route};
use image::DynamicImage;
use std::fmt;
use tracing::{info, warn};

/// What a feature screen found in the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureOutcome {
    Text(String),
    Color(ColorReport),
    QrCodes(Vec<String>),
}

impl fmt::Display for FeatureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureOutcome::Text(text) if text.is_empty() => write!(f, "No text found"),
            FeatureOutcome::Text(text) => write!(f, "{}", text),
            FeatureOutcome::Color(report) => write!(f, "{}", report),
            FeatureOutcome::QrCodes(codes) if codes.is_empty() => write!(f, "No QR code found"),
            FeatureOutcome::QrCodes(codes) => write!(f, "{}", codes.join("\n")),
        }
    }
}

/// Load the image a route points at
pub fn load_image(locator: &ImageLocator) -> Result<DynamicImage, AppError> {
    let path = locator
        .to_path()
        .ok_or_else(|| ImageError::InvalidLocator(locator.to_string()))?;
    Ok(image::open(&path).map_err(ImageError::from)?)
}

/// Run a feature synchronously
pub fn analyze_blocking(
    target: FeatureTarget,
    locator: &ImageLocator,
) -> Result<FeatureOutcome, AppError> {
    let img = load_image(locator)?;
    let outcome = match target {
        FeatureTarget::Scantext => FeatureOutcome::Text(text::scan(&img)?),
        FeatureTarget::ColorDetector => FeatureOutcome::Color(
            color::dominant_color(&img)
                .ok_or_else(|| AppError::Feature("Image has no pixels".to_string()))?,
        ),
        FeatureTarget::QrScanner => FeatureOutcome::QrCodes(qr::scan(&img)),
    };
    info!(feature = %target, locator = %locator, "Feature analysis complete");
    Ok(outcome)
}

/// Serve a route emitted by the capture screen
///
/// The work runs on the blocking pool.
pub async fn open_route(route: Route) -> Result<FeatureOutcome, AppError> {
    let target = route.screen;
    let locator = route.params.image_path;
    tokio::task::spawn_blocking(move || analyze_blocking(target, &locator))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Feature analysis task panicked");
            Err(AppError::Feature(e.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_locator_is_rejected() {
        let result = analyze_blocking(FeatureTarget::QrScanner, &ImageLocator::empty());
        assert!(matches!(
            result,
            Err(AppError::Image(ImageError::InvalidLocator(_)))
        ));
    }

    #[test]
    fn test_color_route() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([220, 20, 60]))
            .save(&path)
            .unwrap();

        let outcome =
            analyze_blocking(FeatureTarget::ColorDetector, &ImageLocator::from_path(&path))
                .unwrap();
        match outcome {
            FeatureOutcome::Color(report) => assert_eq!(report.name, "red"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
