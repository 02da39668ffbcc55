// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture screen
//!
//! The screen moves between three modes:
//!
//! ```text
//!                 take photo               capture
//!   IdleChooser ─────────────► CameraActive ────────► Preview
//!        ▲  │                                          │  │
//!        │  └───────────── upload from library ───────►│  │ use photo
//!        └──────────────────────── retake ─────────────┘  ▼
//!                                                  feature screen
//! ```
//!
//! The model here is synchronous: front ends start asynchronous work with
//! `begin_*`, run the matching function from [`workflow`] and hand the result
//! back with `finish_*`. Every piece of work carries the [`ScreenToken`] of
//! the mount it was started under and is dropped if the screen has since been
//! unmounted or remounted.

pub mod layout;
pub mod state;
pub mod workflow;

pub use layout::{Control, OverlayGuide, ScreenLayout};
pub use state::*;
pub use workflow::{CaptureOutcome, UploadOutcome};

use crate::backends::camera::PermissionStatus;
use crate::backends::navigation::NavigationDispatcher;
use crate::backends::speech::{SpeechAnnouncer, SpeechSession, VoiceSettings};
use crate::constants::phrases;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Asynchronous work the screen is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingWork {
    Capture,
    Upload,
}

/// State of one capture screen
#[derive(Debug)]
pub struct CaptureScreen {
    feature: FeatureTarget,
    camera_available: bool,
    mode: CaptureMode,
    image: ImageResult,
    permission: Option<PermissionStatus>,
    pending: Option<PendingWork>,
    generation: u64,
    mounted: bool,
    speech: Option<SpeechSession>,
}

impl CaptureScreen {
    /// Screen forwarding to `feature`; not yet mounted
    pub fn new(feature: FeatureTarget, camera_available: bool) -> Self {
        Self {
            feature,
            camera_available,
            mode: CaptureMode::default(),
            image: ImageResult::default(),
            permission: None,
            pending: None,
            generation: 0,
            mounted: false,
            speech: None,
        }
    }

    /// Mount the screen: reset state and configure speech
    ///
    /// Returns the token the caller attaches to the permission request and
    /// every later piece of asynchronous work.
    pub fn mount(
        &mut self,
        announcer: Arc<dyn SpeechAnnouncer>,
        voice: &VoiceSettings,
    ) -> ScreenToken {
        self.generation = self.generation.wrapping_add(1);
        self.mounted = true;
        self.mode = CaptureMode::IdleChooser;
        self.image.clear();
        self.pending = None;
        // Release the previous session before configuring the new one
        self.speech = None;
        self.speech = Some(SpeechSession::begin(announcer, voice));

        info!(
            feature = %self.feature,
            generation = self.generation,
            camera_available = self.camera_available,
            "Capture screen mounted"
        );
        ScreenToken(self.generation)
    }

    /// Unmount the screen, cancelling pending speech
    ///
    /// Work still in flight completes into the void.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.pending = None;
        self.speech = None;
        self.generation = self.generation.wrapping_add(1);
        info!(feature = %self.feature, "Capture screen unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Token of the current mount
    pub fn token(&self) -> Option<ScreenToken> {
        self.mounted.then_some(ScreenToken(self.generation))
    }

    /// Whether a result tagged with `token` still belongs to this mount
    pub fn accepts(&self, token: ScreenToken) -> bool {
        self.mounted && token.0 == self.generation
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn image(&self) -> &ImageResult {
        &self.image
    }

    pub fn feature(&self) -> FeatureTarget {
        self.feature
    }

    pub fn camera_available(&self) -> bool {
        self.camera_available
    }

    pub fn permission(&self) -> Option<PermissionStatus> {
        self.permission
    }

    pub fn pending(&self) -> Option<PendingWork> {
        self.pending
    }

    /// Record the answer to the permission request made at mount
    ///
    /// A denial is only logged; the preview simply shows nothing.
    pub fn record_permission(&mut self, token: ScreenToken, status: PermissionStatus) {
        if !self.accepts(token) {
            debug!("Ignoring permission result from a previous mount");
            return;
        }
        if !status.is_granted() {
            warn!("Camera permission denied, live preview will stay empty");
        }
        self.permission = Some(status);
    }

    /// Switch to live camera view
    ///
    /// Returns false when the camera is unavailable or the screen is not
    /// showing the chooser.
    pub fn enter_camera(&mut self) -> bool {
        if !self.interactive() || self.mode != CaptureMode::IdleChooser || self.pending.is_some()
        {
            return false;
        }
        self.mode = CaptureMode::CameraActive;
        self.say(phrases::TAKE_PHOTO);
        debug!("Entered camera mode");
        true
    }

    /// Start a capture from camera mode
    ///
    /// Returns `None` if a capture is already running or the screen is not
    /// in camera mode.
    pub fn begin_capture(&mut self) -> Option<ScreenToken> {
        if !self.interactive() || self.mode != CaptureMode::CameraActive || self.pending.is_some()
        {
            return None;
        }
        self.pending = Some(PendingWork::Capture);
        debug!("Capture started");
        self.token()
    }

    /// Apply the result of [`workflow::capture_and_crop`]
    ///
    /// Returns true if the result was applied.
    pub fn finish_capture(&mut self, token: ScreenToken, outcome: CaptureOutcome) -> bool {
        if !self.accepts(token) {
            debug!("Ignoring capture result from a previous mount");
            return false;
        }
        if self.pending == Some(PendingWork::Capture) {
            self.pending = None;
        }
        match outcome {
            CaptureOutcome::Captured(image) => {
                info!(
                    locator = %image.locator,
                    width = image.width,
                    height = image.height,
                    "Showing captured photo"
                );
                self.image = image;
                self.mode = CaptureMode::Preview;
            }
            CaptureOutcome::Failed(reason) => {
                warn!(%reason, "Capture failed, staying in camera mode");
            }
        }
        true
    }

    /// Start picking a photo from the library
    pub fn begin_upload(&mut self) -> Option<ScreenToken> {
        if !self.interactive() || self.mode != CaptureMode::IdleChooser || self.pending.is_some()
        {
            return None;
        }
        self.say(phrases::UPLOAD_PHOTO);
        self.pending = Some(PendingWork::Upload);
        debug!("Library upload started");
        self.token()
    }

    /// Apply the result of [`workflow::pick_from_library`]
    pub fn finish_upload(&mut self, token: ScreenToken, outcome: UploadOutcome) -> bool {
        if !self.accepts(token) {
            debug!("Ignoring picker result from a previous mount");
            return false;
        }
        if self.pending == Some(PendingWork::Upload) {
            self.pending = None;
        }
        match outcome {
            UploadOutcome::Selected(image) => {
                info!(
                    locator = %image.locator,
                    width = image.width,
                    height = image.height,
                    "Showing library photo"
                );
                self.image = image;
                self.mode = CaptureMode::Preview;
            }
            UploadOutcome::Unchanged => debug!("No photo selected"),
        }
        true
    }

    /// Discard the previewed image and return to the chooser
    ///
    /// Returns false outside preview; camera mode is only left through a
    /// capture.
    pub fn retake(&mut self) -> bool {
        if !self.interactive() || self.mode != CaptureMode::Preview || self.pending.is_some() {
            return false;
        }
        self.image.clear();
        self.mode = CaptureMode::IdleChooser;
        self.say(phrases::RETAKE);
        debug!("Retake");
        true
    }

    /// Forward the current image to the feature screen
    ///
    /// The screen unmounts afterwards. The announcement is left to finish
    /// rather than cancelled with the rest of the session.
    pub fn confirm(&mut self, navigator: &mut dyn NavigationDispatcher) -> Option<Route> {
        if !self.mounted || self.mode != CaptureMode::Preview {
            return None;
        }
        self.say(phrases::USE_PHOTO);

        let route = Route::new(self.feature, self.image.locator.clone());
        navigator.navigate(route.clone());

        if let Some(session) = self.speech.take() {
            session.release();
        }
        self.unmount();
        Some(route)
    }

    /// What the screen currently shows
    pub fn layout(&self) -> ScreenLayout {
        ScreenLayout::for_screen(self)
    }

    fn interactive(&self) -> bool {
        self.mounted && self.camera_available
    }

    fn say(&self, text: &str) {
        if let Some(speech) = &self.speech {
            speech.say(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::navigation::Router;
    use crate::backends::speech::SilentAnnouncer;

    fn mounted(feature: FeatureTarget) -> (CaptureScreen, ScreenToken) {
        let mut screen = CaptureScreen::new(feature, true);
        let token = screen.mount(Arc::new(SilentAnnouncer), &VoiceSettings::default());
        (screen, token)
    }

    fn photo(path: &str, w: u32, h: u32) -> ImageResult {
        ImageResult::new(ImageLocator::new(path), w, h)
    }

    #[test]
    fn test_mount_starts_in_chooser() {
        let (screen, token) = mounted(FeatureTarget::Scantext);
        assert_eq!(screen.mode(), CaptureMode::IdleChooser);
        assert!(screen.image().is_empty());
        assert!(screen.accepts(token));
    }

    #[test]
    fn test_capture_flow_reaches_preview() {
        let (mut screen, _) = mounted(FeatureTarget::Scantext);
        assert!(screen.enter_camera());
        assert_eq!(screen.mode(), CaptureMode::CameraActive);

        let token = screen.begin_capture().unwrap();
        assert!(screen.begin_capture().is_none(), "no parallel captures");

        screen.finish_capture(
            token,
            CaptureOutcome::Captured(photo("file:///c.jpg", 400, 800)),
        );
        assert_eq!(screen.mode(), CaptureMode::Preview);
        assert_eq!(screen.image().width, 400);
        assert!(screen.pending().is_none());
    }

    #[test]
    fn test_failed_acquisition_stays_in_camera() {
        let (mut screen, _) = mounted(FeatureTarget::Scantext);
        screen.enter_camera();
        let token = screen.begin_capture().unwrap();
        screen.finish_capture(token, CaptureOutcome::Failed("no frame".into()));
        assert_eq!(screen.mode(), CaptureMode::CameraActive);
        assert!(screen.begin_capture().is_some());
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let (mut screen, _) = mounted(FeatureTarget::Scantext);
        screen.enter_camera();
        let token = screen.begin_capture().unwrap();

        screen.unmount();
        assert!(!screen.finish_capture(
            token,
            CaptureOutcome::Captured(photo("file:///late.jpg", 1, 1))
        ));

        screen.mount(Arc::new(SilentAnnouncer), &VoiceSettings::default());
        assert!(!screen.finish_capture(
            token,
            CaptureOutcome::Captured(photo("file:///late.jpg", 1, 1))
        ));
        assert!(screen.image().is_empty());
        assert_eq!(screen.mode(), CaptureMode::IdleChooser);
    }

    #[test]
    fn test_retake_clears_image() {
        let (mut screen, _) = mounted(FeatureTarget::Scantext);
        let token = screen.begin_upload().unwrap();
        screen.finish_upload(
            token,
            UploadOutcome::Selected(photo("file:///p.png", 10, 20)),
        );
        assert!(screen.retake());
        assert_eq!(screen.mode(), CaptureMode::IdleChooser);
        assert_eq!(screen.image(), &ImageResult::default());
    }

    #[test]
    fn test_retake_ignored_outside_preview() {
        let (mut screen, _) = mounted(FeatureTarget::Scantext);
        assert!(!screen.retake());
        screen.enter_camera();
        assert!(!screen.retake());
        assert_eq!(screen.mode(), CaptureMode::CameraActive);
    }

    #[test]
    fn test_confirm_forwards_feature_and_unmounts() {
        let (mut screen, _) = mounted(FeatureTarget::ColorDetector);
        let token = screen.begin_upload().unwrap();
        screen.finish_upload(
            token,
            UploadOutcome::Selected(photo("file:///p.png", 10, 20)),
        );

        let mut router = Router::new();
        let route = screen.confirm(&mut router).unwrap();
        assert_eq!(route.screen, FeatureTarget::ColorDetector);
        assert_eq!(route.params.image_path.as_str(), "file:///p.png");
        assert_eq!(router.current(), Some(&route));
        assert!(!screen.is_mounted());
    }

    #[test]
    fn test_unavailable_camera_blocks_every_mode() {
        let mut screen = CaptureScreen::new(FeatureTarget::QrScanner, false);
        screen.mount(Arc::new(SilentAnnouncer), &VoiceSettings::default());
        assert!(!screen.enter_camera());
        assert!(screen.begin_upload().is_none());
        assert_eq!(screen.layout(), ScreenLayout::CameraUnavailable);
    }
}
