// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture screen

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Image dimension or transform errors
    Image(ImageError),
    /// Photo library picker errors
    Picker(String),
    /// Downstream feature analysis errors
    Feature(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Camera initialization failed
    InitializationFailed(String),
    /// No frame has been delivered yet
    NoFrameAvailable,
    /// Frame could not be written to disk
    SaveFailed(String),
}

/// Image dimension query and crop errors
#[derive(Debug, Clone)]
pub enum ImageError {
    /// Locator does not resolve to a readable file
    InvalidLocator(String),
    /// Image header could not be read
    DimensionsUnavailable(String),
    /// Crop rectangle is empty or outside the image
    InvalidCrop(String),
    /// Decoding failed
    DecodeFailed(String),
    /// Encoding or writing the result failed
    EncodeFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Image(e) => write!(f, "Image error: {}", e),
            AppError::Picker(msg) => write!(f, "Picker error: {}", msg),
            AppError::Feature(msg) => write!(f, "Feature error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CameraError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::InvalidLocator(loc) => write!(f, "Invalid image locator: {}", loc),
            ImageError::DimensionsUnavailable(msg) => {
                write!(f, "Image dimensions unavailable: {}", msg)
            }
            ImageError::InvalidCrop(msg) => write!(f, "Invalid crop region: {}", msg),
            ImageError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            ImageError::EncodeFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for ImageError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        AppError::Image(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => ImageError::DecodeFailed(e.to_string()),
            image::ImageError::Encoding(e) => ImageError::EncodeFailed(e.to_string()),
            image::ImageError::IoError(e) => ImageError::InvalidLocator(e.to_string()),
            other => ImageError::DecodeFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err: AppError = CameraError::NoFrameAvailable.into();
        assert_eq!(err.to_string(), "Camera error: No frame available for capture");

        let err: AppError = ImageError::InvalidCrop("0x0".into()).into();
        assert!(err.to_string().contains("0x0"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(AppError::from(io), AppError::Storage(_)));
    }
}
