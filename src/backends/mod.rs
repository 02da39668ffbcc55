// SPDX-License-Identifier: MPL-2.0

//! Collaborators used by the capture screen
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Capture screen                │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │                  Services                   │
//! │  ┌──────────┐ ┌──────────┐ ┌─────────────┐  │
//! │  │  Camera  │ │  Images  │ │   Picker    │  │
//! │  │  (V4L2)  │ │ (image)  │ │   (rfd)     │  │
//! │  └──────────┘ └──────────┘ └─────────────┘  │
//! │  ┌──────────┐ ┌──────────────────────────┐  │
//! │  │  Speech  │ │  Navigation (Router)     │  │
//! │  │ (spd-say)│ │  owned by the front end  │  │
//! │  └──────────┘ └──────────────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: device discovery, live preview and still capture
//! - [`images`]: dimension queries and cropping
//! - [`picker`]: photo library selection
//! - [`speech`]: spoken announcements
//! - [`navigation`]: routing to feature screens

pub mod camera;
pub mod images;
pub mod navigation;
pub mod picker;
pub mod speech;

use crate::config::Config;
use camera::{CameraDevice, V4l2Camera};
use images::{FsImageService, ImageDimensions, ImageTransform};
use picker::{FileDialogPicker, ImagePicker};
use speech::{SilentAnnouncer, SpeechAnnouncer, SpeechDispatcher};
use std::sync::Arc;
use tracing::warn;

/// Shared handles to every collaborator the screen talks to
#[derive(Clone)]
pub struct Services {
    pub camera: Arc<dyn CameraDevice>,
    pub dimensions: Arc<dyn ImageDimensions>,
    pub transform: Arc<dyn ImageTransform>,
    pub picker: Arc<dyn ImagePicker>,
    pub speech: Arc<dyn SpeechAnnouncer>,
}

impl Services {
    /// Build the system collaborators described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::with_camera(
            Arc::new(V4l2Camera::open(config.camera_path.as_deref())),
            config,
        )
    }

    /// System collaborators around an already opened camera
    pub fn with_camera(camera: Arc<dyn CameraDevice>, config: &Config) -> Self {
        let images = Arc::new(FsImageService::default());
        Self {
            camera,
            dimensions: images.clone(),
            transform: images,
            picker: Arc::new(FileDialogPicker::new()),
            speech: announcer_for(config),
        }
    }
}

/// Speech announcer matching the configured preference
pub fn announcer_for(config: &Config) -> Arc<dyn SpeechAnnouncer> {
    if !config.speech_enabled {
        return Arc::new(SilentAnnouncer);
    }
    if !SpeechDispatcher::is_installed() {
        warn!("spd-say not found, announcements disabled");
        return Arc::new(SilentAnnouncer);
    }
    Arc::new(SpeechDispatcher::new())
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("camera", &self.camera.name())
            .finish_non_exhaustive()
    }
}
