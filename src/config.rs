// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::speech::VoiceSettings;
use crate::constants::speech::{DEFAULT_LANGUAGE, DEFAULT_VOICE};
use crate::screen::FeatureTarget;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Application identifier, also the config namespace
pub const APP_ID: &str = "io.github.cosmic-utils.CaptureScreen";

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// V4L2 device path to capture from (first capture device when unset)
    pub camera_path: Option<String>,
    /// Speak mode changes and actions
    pub speech_enabled: bool,
    /// Speech language (BCP 47)
    pub speech_language: String,
    /// speech-dispatcher voice type
    pub speech_voice: String,
    /// Feature screen used when none is given on the command line
    pub default_feature: FeatureTarget,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_path: None,
            speech_enabled: true,
            speech_language: DEFAULT_LANGUAGE.to_string(),
            speech_voice: DEFAULT_VOICE.to_string(),
            default_feature: FeatureTarget::default(),
            mirror_preview: true, // Default to mirrored (selfie mode)
        }
    }
}

impl Config {
    /// Load the stored configuration, returning the handler for later writes
    ///
    /// Errors are logged and defaults are used for anything unreadable.
    pub fn load() -> (Option<cosmic_config::Config>, Self) {
        match cosmic_config::Config::new(APP_ID, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Self::default())
            }
        }
    }

    /// Voice settings derived from the speech fields
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            language: self.speech_language.clone(),
            voice: self.speech_voice.clone(),
        }
    }
}
