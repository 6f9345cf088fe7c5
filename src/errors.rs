// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture, decode and save errors
    Photo(PhotoError),
    /// Media library errors
    Library(LibraryError),
    /// Permission errors
    Permission(PermissionError),
    /// Push and local notification errors
    Notification(NotificationError),
    /// Configuration errors
    Config(String),
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
    /// Backend error (e.g., PipeWire)
    BackendError(String),
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Capture failed
    CaptureFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Decoding the captured file failed
    DecodeFailed(String),
    /// Save failed
    SaveFailed(String),
}

/// Media library errors
#[derive(Debug, Clone)]
pub enum LibraryError {
    /// Album name is empty or cannot be used as a directory name
    InvalidAlbumName(String),
    /// Referenced asset does not exist
    AssetNotFound(String),
    /// Filesystem error
    Io(String),
}

/// Permission errors
#[derive(Debug, Clone)]
pub enum PermissionError {
    /// The permission service could not be reached
    Unavailable(String),
    /// The request was dismissed or failed
    RequestFailed(String),
}

/// Push and local notification errors
#[derive(Debug, Clone)]
pub enum NotificationError {
    /// Session bus could not be reached
    Bus(String),
    /// Token could not be created or read
    Token(String),
    /// Scheduling a local notification failed
    ScheduleFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Library(e) => write!(f, "Library error: {}", e),
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Notification(e) => write!(f, "Notification error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
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
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::InvalidAlbumName(name) => write!(f, "Invalid album name: {:?}", name),
            LibraryError::AssetNotFound(id) => write!(f, "Asset not found: {}", id),
            LibraryError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Unavailable(msg) => write!(f, "Permission service unavailable: {}", msg),
            PermissionError::RequestFailed(msg) => write!(f, "Permission request failed: {}", msg),
        }
    }
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationError::Bus(msg) => write!(f, "D-Bus error: {}", msg),
            NotificationError::Token(msg) => write!(f, "Token error: {}", msg),
            NotificationError::ScheduleFailed(msg) => {
                write!(f, "Failed to schedule notification: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for LibraryError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for NotificationError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        AppError::Library(err)
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        AppError::Notification(err)
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

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io(err.to_string())
    }
}

impl From<LibraryError> for PhotoError {
    fn from(err: LibraryError) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<zbus::Error> for NotificationError {
    fn from(err: zbus::Error) -> Self {
        NotificationError::Bus(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_error_converts_to_save_failure() {
        let err: PhotoError = LibraryError::InvalidAlbumName(String::new()).into();
        assert!(matches!(err, PhotoError::SaveFailed(_)));
    }

    #[test]
    fn test_app_error_display_is_prefixed() {
        let err: AppError = PhotoError::NoFrameAvailable.into();
        assert_eq!(err.to_string(), "Photo error: No frame available for capture");
    }
}
