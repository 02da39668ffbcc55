// SPDX-License-Identifier: GPL-3.0-only

//! Capture and upload workflows
//!
//! Each step runs on the blocking pool and the steps are strictly sequenced.
//! Failures after a photo exists never abort the workflow: the best locator
//! known so far is carried into preview.

use super::state::{CropRegion, ImageLocator, ImageResult};
use crate::backends::camera::CameraDevice;
use crate::backends::images::{ImageDimensions, ImageTransform};
use crate::backends::picker::{ImagePicker, MediaType, PickerResponse};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of a capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A photo exists; show it in preview
    Captured(ImageResult),
    /// No still frame could be acquired
    Failed(String),
}

/// Result of a library pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Selected(ImageResult),
    /// Cancelled, empty or failed pick
    Unchanged,
}

/// Run a blocking closure on the blocking pool
async fn blocking<T, E, F>(step: &'static str, f: F) -> Result<T, String>
where
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => {
            error!(step, error = %e, "Blocking task panicked or was cancelled");
            Err(e.to_string())
        }
    }
}

/// Take a photo, crop it to the centered window and measure the result
pub async fn capture_and_crop(
    camera: Arc<dyn CameraDevice>,
    dimensions: Arc<dyn ImageDimensions>,
    transform: Arc<dyn ImageTransform>,
) -> CaptureOutcome {
    let photo = match blocking("take_photo", move || camera.take_photo()).await {
        Ok(photo) => photo,
        Err(e) => {
            error!(error = %e, "Failed to take photo");
            return CaptureOutcome::Failed(e);
        }
    };

    let original = ImageLocator::from_path(&photo.path);
    // Rotation is not applied; the working image is the original
    let rotated = original.clone();
    debug!(locator = %rotated, "Photo acquired");

    let (width, height) = {
        let dimensions = Arc::clone(&dimensions);
        let locator = rotated.clone();
        match blocking("get_size", move || dimensions.get_size(&locator)).await {
            Ok(size) => size,
            Err(e) => {
                error!(error = %e, locator = %rotated, "Failed to read photo size, skipping crop");
                return CaptureOutcome::Captured(ImageResult::r#unsized(rotated));
            }
        }
    };

    let region = CropRegion::centered(width, height);
    let cropped = {
        let locator = rotated.clone();
        match blocking("crop", move || transform.crop(&locator, region)).await {
            Ok(cropped) => cropped,
            Err(e) => {
                error!(error = %e, locator = %rotated, "Failed to crop photo, using original");
                return CaptureOutcome::Captured(ImageResult::new(rotated, width, height));
            }
        }
    };

    let locator = cropped.clone();
    match blocking("get_size", move || dimensions.get_size(&locator)).await {
        Ok((w, h)) => {
            info!(locator = %cropped, width = w, height = h, "Photo cropped");
            CaptureOutcome::Captured(ImageResult::new(cropped, w, h))
        }
        Err(e) => {
            error!(error = %e, locator = %cropped, "Failed to read cropped size");
            CaptureOutcome::Captured(ImageResult::r#unsized(cropped))
        }
    }
}

/// Pick a photo from the library and measure it; no crop is applied
pub async fn pick_from_library(
    picker: Arc<dyn ImagePicker>,
    dimensions: Arc<dyn ImageDimensions>,
) -> UploadOutcome {
    let response = match picker.pick(MediaType::Photo).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Photo picker failed");
            return UploadOutcome::Unchanged;
        }
    };

    let Some(asset) = response.first_asset().cloned() else {
        if response == PickerResponse::Cancelled {
            debug!("Photo picker cancelled");
        } else {
            debug!("Photo picker returned no assets");
        }
        return UploadOutcome::Unchanged;
    };
    if asset.uri.is_empty() {
        debug!("Picked asset has no locator");
        return UploadOutcome::Unchanged;
    }

    let locator = asset.uri.clone();
    match blocking("get_size", move || dimensions.get_size(&locator)).await {
        Ok((width, height)) => UploadOutcome::Selected(ImageResult::new(asset.uri, width, height)),
        Err(e) => {
            error!(error = %e, locator = %asset.uri, "Failed to read picked photo size");
            UploadOutcome::Selected(ImageResult::r#unsized(asset.uri))
        }
    }
}
