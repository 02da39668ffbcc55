// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture screen state machine

use capture_screen::backends::navigation::{NavigationDispatcher, Router};
use capture_screen::backends::speech::{SpeechAnnouncer, VoiceSettings};
use capture_screen::screen::{
    CaptureMode, CaptureOutcome, CaptureScreen, FeatureTarget, ImageLocator, ImageResult,
    ScreenLayout, UploadOutcome,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SpeechAnnouncer for Recorder {
    fn configure(&self, settings: &VoiceSettings) {
        self.events
            .lock()
            .unwrap()
            .push(format!("configure {} {}", settings.language, settings.voice));
    }
    fn speak(&self, text: &str) {
        self.events.lock().unwrap().push(format!("speak {}", text));
    }
    fn cancel(&self) {
        self.events.lock().unwrap().push("cancel".into());
    }
}

fn photo(path: &str, width: u32, height: u32) -> ImageResult {
    ImageResult::new(ImageLocator::new(path), width, height)
}

#[test]
fn test_capture_flow_announces_and_forwards() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::QrScanner, true);
    screen.mount(recorder.clone(), &VoiceSettings::default());

    assert!(screen.enter_camera());
    let token = screen.begin_capture().expect("capture should start");
    assert!(matches!(
        screen.layout(),
        ScreenLayout::CameraActive {
            capturing: true,
            ..
        }
    ));

    let image = photo("file:///tmp/crop.jpg", 400, 800);
    assert!(screen.finish_capture(token, CaptureOutcome::Captured(image.clone())));
    assert_eq!(screen.mode(), CaptureMode::Preview);
    assert_eq!(screen.image(), &image);

    let mut router = Router::new();
    let route = screen.confirm(&mut router).expect("route");
    assert_eq!(route.screen, FeatureTarget::QrScanner);
    assert_eq!(route.params.image_path, image.locator);
    assert_eq!(router.current(), Some(&route));
    assert!(!screen.is_mounted());

    // "Use photo" is left to finish: no cancel after confirm
    assert_eq!(
        recorder.events(),
        vec![
            "configure en-US male1".to_string(),
            "speak Take a photo".to_string(),
            "speak Use photo".to_string(),
        ]
    );
}

#[test]
fn test_route_serializes_with_image_path() {
    let mut screen = CaptureScreen::new(FeatureTarget::ColorDetector, true);
    let token = screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());
    let upload = screen.begin_upload().expect("upload should start");
    assert_eq!(upload, token);
    screen.finish_upload(
        upload,
        UploadOutcome::Selected(photo("file:///tmp/pick.png", 10, 10)),
    );

    let mut router = Router::new();
    let route = screen.confirm(&mut router).expect("route");
    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "screen": "ColorDetector",
            "params": { "imagePath": "file:///tmp/pick.png" }
        })
    );
}

#[test]
fn test_unmount_cancels_speech() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(recorder.clone(), &VoiceSettings::default());
    screen.unmount();
    assert_eq!(recorder.events().last().map(String::as_str), Some("cancel"));
    assert!(screen.token().is_none());
}

#[test]
fn test_result_from_previous_mount_is_ignored() {
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());
    assert!(screen.enter_camera());
    let stale = screen.begin_capture().expect("capture should start");

    // Leaving and coming back invalidates the running capture
    screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());
    assert!(!screen.finish_capture(
        stale,
        CaptureOutcome::Captured(photo("file:///tmp/late.jpg", 1, 1))
    ));
    assert_eq!(screen.mode(), CaptureMode::IdleChooser);
    assert!(screen.image().is_empty());
    assert!(!screen.accepts(stale));
}

#[test]
fn test_unavailable_camera_blocks_everything() {
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, false);
    screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());
    assert_eq!(screen.layout(), ScreenLayout::CameraUnavailable);
    assert!(screen.layout().controls().is_empty());
    assert!(!screen.enter_camera());
    assert!(screen.begin_upload().is_none());
    assert!(screen.begin_capture().is_none());
}

#[test]
fn test_failed_capture_stays_in_camera_mode() {
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());
    screen.enter_camera();
    let token = screen.begin_capture().unwrap();
    // Only one capture at a time
    assert!(screen.begin_capture().is_none());

    assert!(screen.finish_capture(token, CaptureOutcome::Failed("no frame".into())));
    assert_eq!(screen.mode(), CaptureMode::CameraActive);
    assert!(screen.pending().is_none());
    assert!(screen.begin_capture().is_some());
}

#[test]
fn test_cancelled_upload_keeps_chooser() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(recorder.clone(), &VoiceSettings::default());
    let token = screen.begin_upload().unwrap();
    assert_eq!(screen.layout(), ScreenLayout::Chooser { picking: true });
    // Take a photo is not available while the picker is open
    assert!(!screen.enter_camera());

    screen.finish_upload(token, UploadOutcome::Unchanged);
    assert_eq!(screen.mode(), CaptureMode::IdleChooser);
    assert_eq!(screen.layout(), ScreenLayout::Chooser { picking: false });
    assert!(recorder.events().contains(&"speak Upload a photo".to_string()));
}

#[test]
fn test_retake_discards_photo() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    let token = screen.mount(recorder.clone(), &VoiceSettings::default());
    screen.begin_upload();
    screen.finish_upload(
        token,
        UploadOutcome::Selected(photo("file:///tmp/a.jpg", 200, 100)),
    );
    assert_eq!(
        screen.layout(),
        ScreenLayout::Preview {
            image: photo("file:///tmp/a.jpg", 200, 100),
            aspect_ratio: Some(2.0),
        }
    );

    assert!(screen.retake());
    assert_eq!(screen.mode(), CaptureMode::IdleChooser);
    assert!(screen.image().is_empty());
    assert_eq!(recorder.events().last().map(String::as_str), Some("speak Retake"));
}

#[test]
fn test_retake_during_capture_keeps_camera_mode() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(recorder.clone(), &VoiceSettings::default());
    assert!(screen.enter_camera());
    let token = screen.begin_capture().expect("capture should start");

    // Camera mode is only left through the running capture
    assert!(!screen.retake());
    assert_eq!(screen.mode(), CaptureMode::CameraActive);
    assert!(screen.begin_upload().is_none());

    let image = photo("file:///tmp/late.jpg", 40, 80);
    assert!(screen.finish_capture(token, CaptureOutcome::Captured(image.clone())));
    assert_eq!(screen.mode(), CaptureMode::Preview);
    assert_eq!(screen.image(), &image);
    assert!(!recorder.events().contains(&"speak Retake".to_string()));
}

#[test]
fn test_retake_without_camera_is_silent() {
    let recorder = Arc::new(Recorder::default());
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, false);
    screen.mount(recorder.clone(), &VoiceSettings::default());
    assert!(!screen.retake());
    assert_eq!(recorder.events(), vec!["configure en-US male1".to_string()]);
}

#[test]
fn test_confirm_requires_preview() {
    let mut screen = CaptureScreen::new(FeatureTarget::Scantext, true);
    screen.mount(Arc::new(Recorder::default()), &VoiceSettings::default());

    struct Counting(usize);
    impl NavigationDispatcher for Counting {
        fn navigate(&mut self, _route: capture_screen::screen::Route) {
            self.0 += 1;
        }
    }

    let mut navigator = Counting(0);
    assert!(screen.confirm(&mut navigator).is_none());
    screen.enter_camera();
    assert!(screen.confirm(&mut navigator).is_none());
    assert_eq!(navigator.0, 0);
    assert!(screen.is_mounted());
}
