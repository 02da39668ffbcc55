// SPDX-License-Identifier: MPL-2.0

//! Capture Screen - photo capture and hand-off for the COSMIC desktop
//!
//! The capture screen lets the user take a photo with the camera or pick one
//! from the photo library, crops camera shots to a centered window, shows
//! the result for confirmation and forwards it to a feature screen
//! (text recognition, color detection or QR scanning).
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`screen`]: The capture screen state machine and its workflows
//! - [`backends`]: Camera, image, picker, speech and navigation collaborators
//! - [`features`]: The feature screens photos are forwarded to
//! - [`app`]: COSMIC application front end
//! - [`terminal`]: Terminal front end
//! - [`config`]: User configuration handling
//! - [`storage`]: Cache directories for captures and crops
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // capture-screen --feature QRScanner
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod i18n;
pub mod screen;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use screen::{CaptureMode, CaptureScreen, FeatureTarget, ImageLocator, ImageResult, Route};
