// SPDX-License-Identifier: MPL-2.0

//! COSMIC front end for the capture screen
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, Page)
//! - `handlers`: Message handlers grouped by screen
//! - `update`: Message dispatch
//! - `view`: Rendering of the capture and feature pages
//! - `utils`: Frame conversion helpers

mod handlers;
mod state;
mod update;
mod utils;
mod view;

use crate::backends::Services;
use crate::backends::navigation::Router;
use crate::config::{APP_ID, Config};
use crate::constants::timing;
use crate::screen::{CaptureMode, CaptureScreen, FeatureTarget};
use crate::storage;
use cosmic::iced::Subscription;
use cosmic::{Element, Task};
pub use state::{AppModel, FeatureState, Message, Page, PreviewFrame};
use std::sync::Arc;
use tracing::info;

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Feature screen requested on the command line
    type Flags = Option<FeatureTarget>;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let (config_handler, config) = Config::load();

        storage::prepare_cache(timing::CACHE_MAX_AGE);

        let services = Services::from_config(&config);
        let feature = flags.unwrap_or(config.default_feature);
        let screen = CaptureScreen::new(feature, services.camera.is_available());

        let mut app = AppModel {
            core,
            config,
            config_handler,
            services,
            screen,
            router: Router::new(),
            page: Page::Capture,
            preview_frame: None,
            preview_running: false,
        };

        info!(%feature, "Starting capture screen");
        let task = app.mount_screen();
        (app, task)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::SinkExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Poll the latest-frame slot only while the live view is on screen
        let preview_sub = match (self.screen.mode(), self.screen.token()) {
            (CaptureMode::CameraActive, Some(token)) if self.preview_running => {
                let camera = Arc::clone(&self.services.camera);
                Subscription::run_with_id(
                    ("preview", token.generation()),
                    cosmic::iced::stream::channel(1, move |mut output| async move {
                        info!("Preview subscription started");
                        let mut last_frame = None;
                        loop {
                            tokio::time::sleep(timing::PREVIEW_POLL).await;

                            let Some(frame) = camera.latest_frame() else {
                                continue;
                            };
                            if last_frame == Some(frame.captured_at) {
                                continue;
                            }
                            last_frame = Some(frame.captured_at);

                            if output.send(Message::CameraFrame(frame)).await.is_err() {
                                info!("Preview subscription closed");
                                break;
                            }
                        }
                    }),
                )
            }
            _ => Subscription::none(),
        };

        Subscription::batch([config_sub, preview_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
