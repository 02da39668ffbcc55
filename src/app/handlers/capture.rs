// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Handles mounting the capture screen, camera mode, the capture workflow
//! and the live preview stream.

use crate::app::state::{AppModel, Message, Page, PreviewFrame};
use crate::app::utils::frame_to_handle;
use crate::backends::camera::{CameraFrame, PermissionStatus};
use crate::screen::{CaptureMode, CaptureOutcome, ScreenToken, workflow};
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Screen Lifecycle
    // =========================================================================

    /// Mount the capture screen and request camera access
    pub(crate) fn mount_screen(&mut self) -> Task<cosmic::Action<Message>> {
        self.stop_preview();
        let token = self.screen.mount(
            Arc::clone(&self.services.speech),
            &self.config.voice_settings(),
        );
        self.page = Page::Capture;

        if !self.screen.camera_available() {
            warn!("No camera device, showing static notice");
            return Task::none();
        }

        let camera = Arc::clone(&self.services.camera);
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || camera.request_permission())
                    .await
                    .unwrap_or(PermissionStatus::Denied)
            },
            move |status| cosmic::Action::App(Message::PermissionResolved(token, status)),
        )
    }

    // =========================================================================
    // Camera Mode
    // =========================================================================

    pub(crate) fn handle_take_photo(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.screen.enter_camera() {
            debug!(mode = ?self.screen.mode(), "Ignoring take photo");
            return Task::none();
        }
        let Some(token) = self.screen.token() else {
            return Task::none();
        };

        let camera = Arc::clone(&self.services.camera);
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    camera.start_preview().map_err(|e| e.to_string())
                })
                .await
                .unwrap_or_else(|e| Err(e.to_string()))
            },
            move |result| cosmic::Action::App(Message::PreviewStarted(token, result)),
        )
    }

    pub(crate) fn handle_preview_started(
        &mut self,
        token: ScreenToken,
        result: Result<(), String>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.screen.accepts(token) || self.screen.mode() != CaptureMode::CameraActive {
            debug!("Preview started after leaving camera mode, stopping it");
            self.services.camera.stop_preview();
            return Task::none();
        }
        match result {
            Ok(()) => {
                info!(camera = %self.services.camera.name(), "Live preview running");
                self.preview_running = true;
            }
            Err(e) => warn!(error = %e, "Failed to start live preview"),
        }
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.mode() != CaptureMode::CameraActive {
            return Task::none();
        }
        self.preview_frame = Some(PreviewFrame {
            handle: frame_to_handle(&frame, self.config.mirror_preview),
            width: frame.width,
            height: frame.height,
        });
        Task::none()
    }

    /// Stop the camera stream and forget the last frame
    pub(crate) fn stop_preview(&mut self) {
        if self.preview_running {
            self.services.camera.stop_preview();
            self.preview_running = false;
        }
        self.preview_frame = None;
    }

    // =========================================================================
    // Capture Workflow
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(token) = self.screen.begin_capture() else {
            debug!("Capture already running or not in camera mode");
            return Task::none();
        };

        let camera = Arc::clone(&self.services.camera);
        let dimensions = Arc::clone(&self.services.dimensions);
        let transform = Arc::clone(&self.services.transform);
        Task::perform(
            workflow::capture_and_crop(camera, dimensions, transform),
            move |outcome| cosmic::Action::App(Message::CaptureFinished(token, outcome)),
        )
    }

    pub(crate) fn handle_capture_finished(
        &mut self,
        token: ScreenToken,
        outcome: CaptureOutcome,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.finish_capture(token, outcome)
            && self.screen.mode() != CaptureMode::CameraActive
        {
            self.stop_preview();
        }
        Task::none()
    }
}
