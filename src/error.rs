use std::time::Duration;
use thiserror::Error;

/// Failure reported by a platform service (sensor, filesystem, media library)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Location unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Media library error: {0}")]
    MediaLibrary(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        PlatformError::Filesystem(err.to_string())
    }
}

/// Position acquisition errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcquireError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Could not get location: {0}")]
    AcquisitionFailed(String),
}

impl From<PlatformError> for AcquireError {
    fn from(err: PlatformError) -> Self {
        AcquireError::AcquisitionFailed(err.to_string())
    }
}

/// History export errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("No location data to save")]
    NothingToExport,

    #[error("Permission to access media library is required!")]
    PermissionDenied,

    #[error("Failed to save location data: {0}")]
    Platform(String),
}

impl From<PlatformError> for ExportError {
    fn from(err: PlatformError) -> Self {
        ExportError::Platform(err.to_string())
    }
}

/// Rejection of a user action by the state holder
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0} is already in progress")]
    Busy(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_messages_match_ui_text() {
        assert_eq!(
            AcquireError::PermissionDenied.to_string(),
            "Permission to access location was denied"
        );

        let err: AcquireError = PlatformError::SensorUnavailable("GPS off".to_string()).into();
        assert_eq!(err.to_string(), "Could not get location: Location unavailable: GPS off");
    }

    #[test]
    fn test_export_platform_error_keeps_message() {
        let err: ExportError = PlatformError::Filesystem("disk full".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Failed to save location data: Filesystem error: disk full"
        );
    }
}
