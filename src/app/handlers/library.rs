// SPDX-License-Identifier: GPL-3.0-only

//! Photo library handlers

use crate::app::state::{AppModel, Message};
use crate::screen::{ScreenToken, UploadOutcome, workflow};
use cosmic::Task;
use std::sync::Arc;
use tracing::debug;

impl AppModel {
    pub(crate) fn handle_upload_photo(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(token) = self.screen.begin_upload() else {
            debug!("Upload not available in the current mode");
            return Task::none();
        };

        let picker = Arc::clone(&self.services.picker);
        let dimensions = Arc::clone(&self.services.dimensions);
        Task::perform(
            workflow::pick_from_library(picker, dimensions),
            move |outcome| cosmic::Action::App(Message::UploadFinished(token, outcome)),
        )
    }

    pub(crate) fn handle_upload_finished(
        &mut self,
        token: ScreenToken,
        outcome: UploadOutcome,
    ) -> Task<cosmic::Action<Message>> {
        self.screen.finish_upload(token, outcome);
        Task::none()
    }
}
