// SPDX-License-Identifier: GPL-3.0-only

//! QR code scanning
//!
//! Images are converted to grayscale and downscaled before detection; the
//! decoded payloads are returned in detection order.

use crate::constants::analysis::QR_MAX_DIMENSION;
use image::DynamicImage;
use rqrr::PreparedImage;
use tracing::{debug, trace};

/// Decode every QR code found in `img`
pub fn scan(img: &DynamicImage) -> Vec<String> {
    let start = std::time::Instant::now();
    let (width, height) = (img.width(), img.height());

    let gray = if width > QR_MAX_DIMENSION || height > QR_MAX_DIMENSION {
        img.resize(
            QR_MAX_DIMENSION,
            QR_MAX_DIMENSION,
            image::imageops::FilterType::Triangle,
        )
        .to_luma8()
    } else {
        img.to_luma8()
    };
    trace!(
        width = gray.width(),
        height = gray.height(),
        "Prepared grayscale image for QR detection"
    );

    let mut prepared = PreparedImage::prepare(gray);
    let grids = prepared.detect_grids();

    let mut codes = Vec::with_capacity(grids.len());
    for grid in grids {
        match grid.decode() {
            Ok((_, content)) => {
                debug!(%content, "Decoded QR code");
                codes.push(content);
            }
            Err(e) => debug!(error = %e, "Failed to decode QR grid"),
        }
    }

    debug!(
        count = codes.len(),
        total_ms = start.elapsed().as_millis(),
        "QR scan complete"
    );
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image_has_no_codes() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            64,
            64,
            image::Luma([255]),
        ));
        assert!(scan(&img).is_empty());
    }
}
