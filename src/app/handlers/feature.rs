// SPDX-License-Identifier: GPL-3.0-only

//! Feature screen and settings handlers

use crate::app::state::{AppModel, FeatureState, Message, Page};
use crate::backends::announcer_for;
use crate::config::Config;
use crate::features::FeatureOutcome;
use crate::screen::Route;
use cosmic::Task;
use tracing::{debug, info, warn};

impl AppModel {
    pub(crate) fn handle_feature_analyzed(
        &mut self,
        route: Route,
        result: Result<FeatureOutcome, String>,
    ) -> Task<cosmic::Action<Message>> {
        let Page::Feature {
            route: current,
            state,
        } = &mut self.page
        else {
            debug!("Feature result arrived after leaving the feature screen");
            return Task::none();
        };
        if *current != route {
            debug!("Feature result for a different route");
            return Task::none();
        }

        *state = match result {
            Ok(outcome) => {
                info!(screen = %route.screen, "Feature result ready");
                FeatureState::Done(outcome)
            }
            Err(e) => {
                warn!(screen = %route.screen, error = %e, "Feature analysis failed");
                FeatureState::Failed(e)
            }
        };
        Task::none()
    }

    /// Leave the feature screen and start over on the capture screen
    pub(crate) fn handle_back(&mut self) -> Task<cosmic::Action<Message>> {
        self.router.back();
        self.mount_screen()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }
        info!("Configuration changed");

        if config.speech_enabled != self.config.speech_enabled {
            self.services.speech = announcer_for(&config);
        }
        if config.camera_path != self.config.camera_path {
            info!("Camera device change applies on next start");
        }
        // The running session keeps its voice until the next mount
        self.config = config;
        Task::none()
    }
}
