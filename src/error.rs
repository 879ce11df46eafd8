//! Error types for toolbar controls and their persisted settings

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ControlError>;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Control '{class_name}' has no editor attached")]
    NoHost { class_name: String },

    #[error("Editor of control '{class_name}' has been dropped")]
    HostDropped { class_name: String },

    #[error("Control '{class_name}' has a dialog but is not mounted on a map")]
    NoSurface { class_name: String },

    #[error("Control '{class_name}' needs either a vector source or a feature collection")]
    MissingFeatures { class_name: String },

    #[error("Unknown control: {id}")]
    UnknownControl { id: String },

    #[error("No settings directory available on this platform")]
    NoSettingsDir,

    #[error("Failed to write settings to {path}: {message}")]
    SettingsWrite { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ControlError::NoHost {
            class_name: "ole-measure".to_string(),
        };
        assert_eq!(err.to_string(), "Control 'ole-measure' has no editor attached");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ControlError = io.into();
        assert!(matches!(err, ControlError::Io(_)));
    }
}
