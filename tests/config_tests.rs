// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use capture_screen::Config;
use capture_screen::screen::FeatureTarget;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.mirror_preview, true,
        "Mirror preview should be enabled by default"
    );
    assert!(config.speech_enabled, "Speech should be enabled by default");
    assert_eq!(config.default_feature, FeatureTarget::Scantext);
    assert!(config.camera_path.is_none());
}

#[test]
fn test_config_voice_settings() {
    // Voice settings mirror the speech fields
    let config = Config {
        speech_language: "de-DE".to_string(),
        speech_voice: "female2".to_string(),
        ..Config::default()
    };
    let voice = config.voice_settings();
    assert_eq!(voice.language, "de-DE");
    assert_eq!(voice.voice, "female2");
}

#[test]
fn test_config_default_voice() {
    let voice = Config::default().voice_settings();
    assert_eq!(voice.language, "en-US");
    assert_eq!(voice.voice, "male1");
}
