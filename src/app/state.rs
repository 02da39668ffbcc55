// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::Services;
use crate::backends::camera::{CameraFrame, PermissionStatus};
use crate::backends::navigation::Router;
use crate::config::Config;
use crate::features::FeatureOutcome;
use crate::screen::{CaptureOutcome, CaptureScreen, Route, ScreenToken, UploadOutcome};
use cosmic::cosmic_config;
use cosmic::widget::image::Handle;
use std::sync::Arc;

/// Result of the feature screen a photo was handed to
#[derive(Debug, Clone)]
pub enum FeatureState {
    /// Analysis still running
    Analyzing,
    Done(FeatureOutcome),
    Failed(String),
}

/// Page currently shown in the window
#[derive(Debug, Clone)]
pub enum Page {
    /// The capture screen
    Capture,
    /// A feature screen showing the forwarded photo
    Feature { route: Route, state: FeatureState },
}

/// Latest live preview frame, ready for display
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Collaborators of the capture screen
    pub services: Services,
    /// Capture screen model
    pub screen: CaptureScreen,
    /// Routes emitted by the capture screen
    pub router: Router,
    /// Page on display
    pub page: Page,
    /// Latest frame from the live preview
    pub preview_frame: Option<PreviewFrame>,
    /// Whether the camera stream is running
    pub preview_running: bool,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Capture Screen =====
    /// Answer to the permission request made at mount
    PermissionResolved(ScreenToken, PermissionStatus),
    /// "Take a Photo" pressed
    TakePhoto,
    /// "Upload a Photo" pressed
    UploadPhoto,
    /// Capture trigger pressed
    Capture,
    /// Capture workflow finished
    CaptureFinished(ScreenToken, CaptureOutcome),
    /// Library pick finished
    UploadFinished(ScreenToken, UploadOutcome),
    /// "Retake" pressed
    Retake,
    /// "Use Photo" pressed
    UsePhoto,

    // ===== Live Preview =====
    /// Camera stream started (or failed to)
    PreviewStarted(ScreenToken, Result<(), String>),
    /// New frame polled from the camera
    CameraFrame(Arc<CameraFrame>),

    // ===== Feature Screens =====
    /// Feature analysis finished for a route
    FeatureAnalyzed(Route, Result<FeatureOutcome, String>),
    /// Leave the feature screen and remount the capture screen
    Back,

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
}
