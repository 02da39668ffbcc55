// SPDX-License-Identifier: MPL-2.0

//! Camera device abstraction
//!
//! The capture screen only needs a small contract from the camera:
//!
//! ```text
//! ┌─────────────────────┐
//! │  Capture screen     │
//! └──────────┬──────────┘
//!            │  request_permission / take_photo / latest_frame
//!            ▼
//! ┌─────────────────────┐
//! │ CameraDevice trait  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!        ┌──────┐
//!        │ V4L2 │  ← Concrete implementation
//!        └──────┘
//! ```

pub mod format_converters;
pub mod types;
pub mod v4l2;

pub use types::*;
pub use v4l2::{V4l2Camera, enumerate_cameras};

use std::sync::Arc;

/// Camera device contract
///
/// All methods are synchronous and may block on device I/O; callers on an
/// async runtime run them through `spawn_blocking`.
pub trait CameraDevice: Send + Sync {
    /// Whether a capture device exists at all
    ///
    /// When this is false the capture screen renders only a static notice.
    fn is_available(&self) -> bool;

    /// Ask for access to the device
    fn request_permission(&self) -> PermissionStatus;

    /// Start streaming frames for live preview
    fn start_preview(&self) -> CameraResult<()>;

    /// Stop streaming (no-op when not streaming)
    fn stop_preview(&self);

    /// Most recent preview frame, if any has arrived
    fn latest_frame(&self) -> Option<Arc<CameraFrame>>;

    /// Acquire a still frame and write it to disk
    fn take_photo(&self) -> CameraResult<CapturedPhoto>;

    /// Human readable device name for logs and UI
    fn name(&self) -> String;
}
