// SPDX-License-Identifier: GPL-3.0-only

//! Photo library picker
//!
//! The desktop "photo library" is the file chooser portal, filtered to image
//! extensions. A closed dialog is reported as [`PickerResponse::Cancelled`].

use crate::constants::PHOTO_EXTENSIONS;
use crate::errors::AppError;
use crate::screen::ImageLocator;
use futures::future::BoxFuture;
use std::path::PathBuf;
use tracing::{debug, info};

/// Kind of media the picker is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Photo,
}

/// One asset returned by the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    pub uri: ImageLocator,
}

/// Picker outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResponse {
    Picked { assets: Vec<PickedAsset> },
    Cancelled,
}

impl PickerResponse {
    /// First selected asset, if any
    pub fn first_asset(&self) -> Option<&PickedAsset> {
        match self {
            PickerResponse::Picked { assets } => assets.first(),
            PickerResponse::Cancelled => None,
        }
    }
}

/// Photo library contract
pub trait ImagePicker: Send + Sync {
    fn pick(&self, media: MediaType) -> BoxFuture<'static, Result<PickerResponse, AppError>>;
}

/// File chooser backed picker using `rfd`
#[derive(Debug, Clone, Default)]
pub struct FileDialogPicker {
    start_dir: Option<PathBuf>,
}

impl FileDialogPicker {
    pub fn new() -> Self {
        Self {
            start_dir: dirs::picture_dir(),
        }
    }
}

impl ImagePicker for FileDialogPicker {
    fn pick(&self, media: MediaType) -> BoxFuture<'static, Result<PickerResponse, AppError>> {
        let start_dir = self.start_dir.clone();
        Box::pin(async move {
            let mut dialog = rfd::AsyncFileDialog::new().set_title("Upload a Photo");
            match media {
                MediaType::Photo => {
                    dialog = dialog.add_filter("Photos", PHOTO_EXTENSIONS);
                }
            }
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }

            match dialog.pick_file().await {
                Some(handle) => {
                    let path = handle.path().to_path_buf();
                    info!(path = %path.display(), "Photo picked from library");
                    Ok(PickerResponse::Picked {
                        assets: vec![PickedAsset {
                            uri: ImageLocator::from_path(&path),
                        }],
                    })
                }
                None => {
                    debug!("Photo picker dismissed");
                    Ok(PickerResponse::Cancelled)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_asset() {
        let asset = PickedAsset {
            uri: ImageLocator::new("file:///tmp/a.png"),
        };
        let picked = PickerResponse::Picked {
            assets: vec![asset.clone()],
        };
        assert_eq!(picked.first_asset(), Some(&asset));
        assert_eq!(PickerResponse::Picked { assets: vec![] }.first_asset(), None);
        assert_eq!(PickerResponse::Cancelled.first_asset(), None);
    }
}
