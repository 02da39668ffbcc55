// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handlers live in
//! the `handlers` submodules:
//!
//! - `handlers::capture`: mount, camera mode, capture workflow, live preview
//! - `handlers::library`: photo library upload
//! - `handlers::preview`: retake and hand-off
//! - `handlers::feature`: feature screen results and navigation back

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Capture Screen =====
            Message::PermissionResolved(token, status) => {
                self.screen.record_permission(token, status);
                Task::none()
            }
            Message::TakePhoto => self.handle_take_photo(),
            Message::Capture => self.handle_capture(),
            Message::CaptureFinished(token, outcome) => {
                self.handle_capture_finished(token, outcome)
            }
            Message::UploadPhoto => self.handle_upload_photo(),
            Message::UploadFinished(token, outcome) => self.handle_upload_finished(token, outcome),
            Message::Retake => self.handle_retake(),
            Message::UsePhoto => self.handle_use_photo(),

            // ===== Live Preview =====
            Message::PreviewStarted(token, result) => self.handle_preview_started(token, result),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Feature Screens =====
            Message::FeatureAnalyzed(route, result) => self.handle_feature_analyzed(route, result),
            Message::Back => self.handle_back(),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }
}
