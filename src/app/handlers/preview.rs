// SPDX-License-Identifier: GPL-3.0-only

//! Preview handlers: retake and hand-off to the feature screen

use crate::app::state::{AppModel, FeatureState, Message, Page};
use crate::features;
use cosmic::Task;
use tracing::{debug, info};

impl AppModel {
    pub(crate) fn handle_retake(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.screen.retake() {
            debug!(mode = ?self.screen.mode(), "Ignoring retake");
        }
        Task::none()
    }

    pub(crate) fn handle_use_photo(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(route) = self.screen.confirm(&mut self.router) else {
            debug!("Nothing to forward");
            return Task::none();
        };
        self.stop_preview();

        info!(screen = %route.screen, "Opening feature screen");
        self.page = Page::Feature {
            route: route.clone(),
            state: FeatureState::Analyzing,
        };

        let request = route.clone();
        Task::perform(features::open_route(request), move |result| {
            cosmic::Action::App(Message::FeatureAnalyzed(
                route.clone(),
                result.map_err(|e| e.to_string()),
            ))
        })
    }
}
