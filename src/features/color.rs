// SPDX-License-Identifier: GPL-3.0-only

//! Dominant color detection
//!
//! The image is shrunk to a small thumbnail, pixels are bucketed by their
//! top four bits per channel and the most populated bucket wins. Its mean
//! color is reported together with the nearest named color.

use crate::constants::analysis::COLOR_SAMPLE_DIMENSION;
use image::DynamicImage;
use std::collections::HashMap;
use std::fmt;

/// Named reference colors
const PALETTE: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("gray", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("red", [220, 20, 60]),
    ("maroon", [128, 0, 0]),
    ("orange", [255, 140, 0]),
    ("yellow", [255, 215, 0]),
    ("olive", [128, 128, 0]),
    ("green", [34, 139, 34]),
    ("lime", [50, 205, 50]),
    ("teal", [0, 128, 128]),
    ("cyan", [0, 206, 209]),
    ("blue", [30, 60, 220]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("magenta", [255, 0, 255]),
    ("pink", [255, 160, 190]),
    ("brown", [139, 69, 19]),
    ("beige", [245, 222, 179]),
];

/// Dominant color of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorReport {
    pub rgb: [u8; 3],
    /// Nearest entry of the named palette
    pub name: &'static str,
    /// Share of sampled pixels in the dominant bucket, 0-100
    pub coverage_percent: u8,
}

impl ColorReport {
    /// "#rrggbb"
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

impl fmt::Display for ColorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.hex())
    }
}

/// Find the dominant color; `None` for an empty image
pub fn dominant_color(img: &DynamicImage) -> Option<ColorReport> {
    if img.width() == 0 || img.height() == 0 {
        return None;
    }

    let sample = if img.width() > COLOR_SAMPLE_DIMENSION || img.height() > COLOR_SAMPLE_DIMENSION
    {
        img.thumbnail(COLOR_SAMPLE_DIMENSION, COLOR_SAMPLE_DIMENSION)
            .to_rgb8()
    } else {
        img.to_rgb8()
    };
    let total = sample.width() as u64 * sample.height() as u64;

    // bucket -> (count, channel sums)
    let mut buckets: HashMap<[u8; 3], (u64, [u64; 3])> = HashMap::new();
    for pixel in sample.pixels() {
        let [r, g, b] = pixel.0;
        let entry = buckets.entry([r >> 4, g >> 4, b >> 4]).or_default();
        entry.0 += 1;
        entry.1[0] += r as u64;
        entry.1[1] += g as u64;
        entry.1[2] += b as u64;
    }

    let (count, sums) = buckets
        .into_values()
        .max_by_key(|(count, sums)| (*count, sums[0] + sums[1] + sums[2]))?;

    let rgb = [
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ];
    Some(ColorReport {
        rgb,
        name: nearest_name(rgb),
        coverage_percent: (count * 100 / total.max(1)) as u8,
    })
}

/// Name of the palette entry closest to `rgb`
pub fn nearest_name(rgb: [u8; 3]) -> &'static str {
    PALETTE
        .iter()
        .min_by_key(|(_, reference)| {
            reference
                .iter()
                .zip(rgb.iter())
                .map(|(a, b)| {
                    let d = *a as i32 - *b as i32;
                    d * d
                })
                .sum::<i32>()
        })
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            40,
            20,
            image::Rgb([250, 250, 250]),
        ));
        let report = dominant_color(&img).unwrap();
        assert_eq!(report.rgb, [250, 250, 250]);
        assert_eq!(report.name, "white");
        assert_eq!(report.coverage_percent, 100);
        assert_eq!(report.hex(), "#fafafa");
    }

    #[test]
    fn test_majority_wins() {
        let mut img = image::RgbImage::from_pixel(10, 10, image::Rgb([0, 0, 200]));
        for x in 0..3 {
            for y in 0..10 {
                img.put_pixel(x, y, image::Rgb([220, 20, 60]));
            }
        }
        let report = dominant_color(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(report.rgb, [0, 0, 200]);
        assert_eq!(report.coverage_percent, 70);
    }

    #[test]
    fn test_nearest_name() {
        assert_eq!(nearest_name([5, 5, 5]), "black");
        assert_eq!(nearest_name([40, 140, 40]), "green");
    }
}
