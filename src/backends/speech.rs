// SPDX-License-Identifier: GPL-3.0-only

//! Spoken announcements
//!
//! Announcements go through speech-dispatcher's `spd-say` client. Each call
//! spawns the client and returns immediately; a reaper thread collects the
//! child so no zombies are left behind.

use crate::constants::speech::{DEFAULT_LANGUAGE, DEFAULT_VOICE, SPD_SAY};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Language and voice used for announcements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    /// BCP 47 language tag, e.g. "en-US"
    pub language: String,
    /// Voice identifier, e.g. "male1"
    pub voice: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

/// Speech announcer contract
///
/// `speak` is fire-and-forget; no acknowledgement is awaited.
pub trait SpeechAnnouncer: Send + Sync {
    /// Apply language and voice. Repeating the same settings is a no-op.
    fn configure(&self, settings: &VoiceSettings);

    fn speak(&self, text: &str);

    /// Stop anything currently being spoken
    fn cancel(&self);
}

/// speech-dispatcher announcer
#[derive(Debug, Default)]
pub struct SpeechDispatcher {
    settings: Mutex<Option<VoiceSettings>>,
}

impl SpeechDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `spd-say` can be found on PATH
    pub fn is_installed() -> bool {
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(SPD_SAY).is_file()))
            .unwrap_or(false)
    }

    fn current_settings(&self) -> VoiceSettings {
        self.settings
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn spawn(args: &[&str]) {
        match Command::new(SPD_SAY)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(mut child) => {
                std::thread::spawn(move || {
                    if let Err(e) = child.wait() {
                        debug!(error = %e, "spd-say did not exit cleanly");
                    }
                });
            }
            Err(e) => warn!(error = %e, "Failed to launch spd-say"),
        }
    }
}

impl SpeechAnnouncer for SpeechDispatcher {
    fn configure(&self, settings: &VoiceSettings) {
        let Ok(mut current) = self.settings.lock() else {
            return;
        };
        if current.as_ref() == Some(settings) {
            return;
        }
        info!(
            language = %settings.language,
            voice = %settings.voice,
            "Speech configured"
        );
        *current = Some(settings.clone());
    }

    fn speak(&self, text: &str) {
        let settings = self.current_settings();
        debug!(text, language = %settings.language, "Announcing");
        Self::spawn(&["-l", &settings.language, "-t", &settings.voice, text]);
    }

    fn cancel(&self) {
        Self::spawn(&["-C"]);
    }
}

/// Announcer used when speech is disabled; only logs
#[derive(Debug, Default)]
pub struct SilentAnnouncer;

impl SpeechAnnouncer for SilentAnnouncer {
    fn configure(&self, _settings: &VoiceSettings) {}

    fn speak(&self, text: &str) {
        debug!(text, "Speech disabled, not announcing");
    }

    fn cancel(&self) {}
}

/// Speech held for the lifetime of one screen mount
///
/// Creating the session configures the announcer; dropping it cancels any
/// pending speech unless the session was [released](SpeechSession::release).
pub struct SpeechSession {
    announcer: Arc<dyn SpeechAnnouncer>,
    cancel_on_drop: bool,
}

impl SpeechSession {
    pub fn begin(announcer: Arc<dyn SpeechAnnouncer>, settings: &VoiceSettings) -> Self {
        announcer.configure(settings);
        Self {
            announcer,
            cancel_on_drop: true,
        }
    }

    pub fn say(&self, text: &str) {
        self.announcer.speak(text);
    }

    /// End the session, letting the last announcement finish
    pub fn release(mut self) {
        self.cancel_on_drop = false;
    }
}

impl Drop for SpeechSession {
    fn drop(&mut self) {
        if self.cancel_on_drop {
            self.announcer.cancel();
        }
    }
}

impl std::fmt::Debug for SpeechSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSession").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SpeechAnnouncer for Recorder {
        fn configure(&self, settings: &VoiceSettings) {
            self.events
                .lock()
                .unwrap()
                .push(format!("configure {}", settings.language));
        }
        fn speak(&self, text: &str) {
            self.events.lock().unwrap().push(format!("speak {}", text));
        }
        fn cancel(&self) {
            self.events.lock().unwrap().push("cancel".into());
        }
    }

    #[test]
    fn test_session_configures_and_cancels() {
        let recorder = Arc::new(Recorder::default());
        {
            let session = SpeechSession::begin(recorder.clone(), &VoiceSettings::default());
            session.say("Retake");
        }
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["configure en-US", "speak Retake", "cancel"]
        );
    }

    #[test]
    fn test_released_session_does_not_cancel() {
        let recorder = Arc::new(Recorder::default());
        let session = SpeechSession::begin(recorder.clone(), &VoiceSettings::default());
        session.say("Use photo");
        session.release();
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["configure en-US", "speak Use photo"]
        );
    }

    #[test]
    fn test_dispatcher_configure_is_idempotent() {
        let dispatcher = SpeechDispatcher::new();
        let settings = VoiceSettings {
            language: "en-GB".into(),
            voice: "female1".into(),
        };
        dispatcher.configure(&settings);
        dispatcher.configure(&settings);
        assert_eq!(dispatcher.current_settings(), settings);
    }

    #[test]
    fn test_default_settings() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.language, "en-US");
        assert_eq!(settings.voice, "male1");
    }
}
