// SPDX-License-Identifier: GPL-3.0-only

//! Image dimension and transform services
//!
//! Both services resolve `file://` locators to local paths and work on the
//! files through the `image` crate. Methods block on disk I/O and decoding.

use crate::constants::JPEG_QUALITY;
use crate::errors::ImageError;
use crate::screen::{CropRegion, ImageLocator};
use crate::storage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Query the pixel dimensions of an image
pub trait ImageDimensions: Send + Sync {
    fn get_size(&self, locator: &ImageLocator) -> Result<(u32, u32), ImageError>;
}

/// Produce transformed copies of an image
pub trait ImageTransform: Send + Sync {
    /// Crop to `region` and return the locator of the new image
    fn crop(&self, locator: &ImageLocator, region: CropRegion) -> Result<ImageLocator, ImageError>;
}

/// Filesystem-backed implementation of both services
#[derive(Debug, Clone)]
pub struct FsImageService {
    output_dir: PathBuf,
}

impl Default for FsImageService {
    fn default() -> Self {
        Self::new(storage::crop_directory())
    }
}

impl FsImageService {
    /// Crops are written to `output_dir`
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

fn resolve(locator: &ImageLocator) -> Result<PathBuf, ImageError> {
    locator
        .to_path()
        .ok_or_else(|| ImageError::InvalidLocator(locator.to_string()))
}

impl ImageDimensions for FsImageService {
    fn get_size(&self, locator: &ImageLocator) -> Result<(u32, u32), ImageError> {
        let path = resolve(locator)?;
        let dims = image::image_dimensions(&path)
            .map_err(|e| ImageError::DimensionsUnavailable(e.to_string()))?;
        debug!(path = %path.display(), width = dims.0, height = dims.1, "Read image dimensions");
        Ok(dims)
    }
}

impl ImageTransform for FsImageService {
    fn crop(&self, locator: &ImageLocator, region: CropRegion) -> Result<ImageLocator, ImageError> {
        let source = resolve(locator)?;
        let img = image::open(&source)?;

        let rect = region.to_pixels(img.width(), img.height());
        if rect.is_empty() {
            return Err(ImageError::InvalidCrop(rect.to_string()));
        }

        let cropped = img.crop_imm(rect.x, rect.y, rect.width, rect.height);

        storage::ensure_directory(&self.output_dir)
            .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
        let dest = storage::new_crop_path(&self.output_dir);
        write_jpeg(&cropped, &dest)?;

        info!(
            source = %source.display(),
            dest = %dest.display(),
            rect = %rect,
            "Cropped image"
        );
        Ok(ImageLocator::from_path(&dest))
    }
}

fn write_jpeg(img: &image::DynamicImage, path: &Path) -> Result<(), ImageError> {
    let file =
        std::fs::File::create(path).map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder)?;
    std::io::Write::flush(&mut writer).map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path, width: u32, height: u32) -> ImageLocator {
        let path = dir.join("fixture.png");
        image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();
        ImageLocator::from_path(&path)
    }

    #[test]
    fn test_get_size() {
        let dir = tempfile::tempdir().unwrap();
        let locator = write_fixture(dir.path(), 50, 20);
        let service = FsImageService::new(dir.path().join("crops"));
        assert_eq!(service.get_size(&locator).unwrap(), (50, 20));
    }

    #[test]
    fn test_get_size_missing_file() {
        let service = FsImageService::new(std::env::temp_dir());
        let locator = ImageLocator::new("file:///nonexistent/photo.jpg");
        assert!(matches!(
            service.get_size(&locator),
            Err(ImageError::DimensionsUnavailable(_))
        ));
    }

    #[test]
    fn test_get_size_rejects_non_file_locator() {
        let service = FsImageService::new(std::env::temp_dir());
        let locator = ImageLocator::new("content://media/external/1");
        assert!(matches!(
            service.get_size(&locator),
            Err(ImageError::InvalidLocator(_))
        ));
    }

    #[test]
    fn test_crop_writes_new_image() {
        let dir = tempfile::tempdir().unwrap();
        let locator = write_fixture(dir.path(), 100, 200);
        let service = FsImageService::new(dir.path().join("crops"));

        let cropped = service
            .crop(&locator, CropRegion::centered(100, 200))
            .unwrap();
        assert_ne!(cropped, locator);
        assert_eq!(service.get_size(&cropped).unwrap(), (40, 80));
    }

    #[test]
    fn test_crop_rejects_empty_region() {
        let dir = tempfile::tempdir().unwrap();
        let locator = write_fixture(dir.path(), 1, 1);
        let service = FsImageService::new(dir.path().join("crops"));
        assert!(matches!(
            service.crop(&locator, CropRegion::centered(1, 1)),
            Err(ImageError::InvalidCrop(_))
        ));
    }
}
