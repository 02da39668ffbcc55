// SPDX-License-Identifier: GPL-3.0-only

//! Text scanning through the system tesseract

use crate::constants::analysis::OCR_LANGUAGE;
use crate::errors::AppError;
use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use tracing::info;

/// Recognize the text in `img`
///
/// Small images are upscaled first; tesseract needs glyphs of roughly a
/// dozen pixels.
pub fn scan(img: &DynamicImage) -> Result<String, AppError> {
    let min_dimension = img.width().min(img.height());
    let factor = match min_dimension {
        0..100 => 4,
        100..200 => 2,
        _ => 1,
    };
    let processed = if factor > 1 {
        img.resize(
            img.width() * factor,
            img.height() * factor,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        img.clone()
    };

    info!(
        width = processed.width(),
        height = processed.height(),
        factor,
        "Running text recognition"
    );

    let tess_img = Image::from_dynamic_image(&processed)
        .map_err(|e| AppError::Feature(format!("Failed to prepare image for OCR: {}", e)))?;
    let args = Args {
        lang: OCR_LANGUAGE.to_string(),
        config_variables: HashMap::new(),
        dpi: Some(if min_dimension < 200 { 300 } else { 150 }),
        psm: Some(3),
        oem: Some(3),
    };

    let text = rusty_tesseract::image_to_string(&tess_img, &args)
        .map_err(|e| AppError::Feature(format!("Text recognition failed: {}", e)))?;
    Ok(normalize(&text))
}

/// Trim trailing whitespace per line and drop blank runs
fn normalize(raw: &str) -> String {
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Hello  \n\n world\n\x0c"), "Hello\n world");
        assert_eq!(normalize("\n\n"), "");
    }
}
