// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing capture devices
//! - Running the capture screen headless (capture, crop, hand off)
//! - Running a feature screen on an existing image

use capture_screen::backends::Services;
use capture_screen::backends::camera::{
    CameraDevice, V4l2Camera, enumerate_cameras, v4l2::query_device_info,
};
use capture_screen::backends::navigation::Router;
use capture_screen::constants::timing;
use capture_screen::screen::{CaptureScreen, FeatureTarget, ImageLocator, Route, workflow};
use capture_screen::{Config, features, storage};
use std::path::PathBuf;
use std::sync::Arc;

/// List all V4L2 capture devices
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
        if let Some((info, _)) = query_device_info(&camera.path) {
            println!("      Driver: {} ({})", info.driver, info.bus);
        }
        println!();
    }

    Ok(())
}

/// Capture, crop and hand off without a UI
///
/// Prints the route as JSON; with `analyze` the feature screen is run on it
/// as well.
pub fn take_photo(
    camera_index: Option<usize>,
    feature: Option<FeatureTarget>,
    analyze: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config) = Config::load();
    storage::prepare_cache(timing::CACHE_MAX_AGE);

    let camera = match camera_index {
        Some(index) => {
            let cameras = enumerate_cameras();
            if cameras.is_empty() {
                return Err("No cameras found".into());
            }
            let descriptor = cameras.get(index).cloned().ok_or_else(|| {
                format!(
                    "Camera index {} out of range (0-{})",
                    index,
                    cameras.len() - 1
                )
            })?;
            V4l2Camera::with_device(Some(descriptor), storage::capture_directory())
        }
        None => V4l2Camera::open(config.camera_path.as_deref()),
    };
    if !camera.is_available() {
        return Err("Camera not available".into());
    }
    eprintln!("Using camera: {}", camera.name());

    let camera = Arc::new(camera);
    let services = Services::with_camera(camera.clone(), &config);

    let feature = feature.unwrap_or(config.default_feature);
    let mut screen = CaptureScreen::new(feature, true);
    let mount = screen.mount(services.speech.clone(), &config.voice_settings());
    screen.record_permission(mount, camera.request_permission());

    camera.start_preview()?;
    eprintln!("Capturing...");
    // Let exposure settle before the still is taken
    let warmed_up = camera.wait_for_frame(timing::CAMERA_WARMUP, timing::FIRST_FRAME_TIMEOUT);

    screen.enter_camera();
    let token = screen
        .begin_capture()
        .ok_or("Capture screen is not ready to capture")?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = match warmed_up {
        Ok(_) => rt.block_on(workflow::capture_and_crop(
            services.camera.clone(),
            services.dimensions.clone(),
            services.transform.clone(),
        )),
        Err(e) => workflow::CaptureOutcome::Failed(e.to_string()),
    };
    camera.stop_preview();

    if let workflow::CaptureOutcome::Failed(reason) = &outcome {
        return Err(format!("Failed to capture photo: {}", reason).into());
    }
    screen.finish_capture(token, outcome);

    let image = screen.image().clone();
    eprintln!(
        "Photo: {} ({}x{})",
        image.locator, image.width, image.height
    );

    let mut router = Router::new();
    let route = screen
        .confirm(&mut router)
        .ok_or("Capture screen has no photo to forward")?;
    println!("{}", serde_json::to_string(&route)?);

    if analyze {
        print_feature(&rt, route)?;
    }
    Ok(())
}

/// Run a feature screen on an image file
pub fn analyze(image: PathBuf, feature: FeatureTarget) -> Result<(), Box<dyn std::error::Error>> {
    let path = std::fs::canonicalize(&image)
        .map_err(|e| format!("Cannot open {}: {}", image.display(), e))?;
    let route = Route::new(feature, ImageLocator::from_path(&path));
    let rt = tokio::runtime::Runtime::new()?;
    print_feature(&rt, route)
}

fn print_feature(
    rt: &tokio::runtime::Runtime,
    route: Route,
) -> Result<(), Box<dyn std::error::Error>> {
    let screen = route.screen;
    let outcome = rt.block_on(features::open_route(route))?;
    println!("{}:", screen);
    println!("{}", outcome);
    Ok(())
}
