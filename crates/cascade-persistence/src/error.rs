//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store key that cannot be mapped to a storage location.
    #[error("Invalid store key '{key}'")]
    InvalidKey { key: String },

    /// Stored data is not a readable store file.
    #[error("Invalid store data for '{key}': {reason}")]
    InvalidFormat { key: String, reason: String },

    /// Unsupported schema version.
    #[error("Store file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        key: String,
    },

    /// Payload does not match the checksum recorded when it was saved.
    #[error("Store data for '{key}' failed its integrity check")]
    ChecksumMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// Serialization error.
    #[error("Failed to serialize store data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize store data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests right now.
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}.", operation, path.display())
            }
            Self::InvalidKey { key } => {
                format!("'{}' cannot be used as a storage name.", key)
            }
            Self::InvalidFormat { key, reason } => {
                format!("The saved options for '{}' could not be read: {}.", key, reason)
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "The saved options were written by a newer version \
                    (file version {}, this version supports up to {}).",
                    found, max_supported
                )
            }
            Self::ChecksumMismatch { key, .. } => {
                format!(
                    "The saved options for '{}' appear to be damaged or edited by hand.",
                    key
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the option data.".to_string()
            }
            Self::Deserialization { .. } => {
                "An error occurred while reading the option data. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Unavailable { reason } => {
                format!("Option storage is unavailable: {}.", reason)
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidKey { .. } => {
                Some("Use a key made of letters, digits, '-', '_' or '.'.".into())
            }
            Self::InvalidFormat { .. } | Self::ChecksumMismatch { .. } => {
                Some("Restore the file from a backup, or delete it to start from the seed options.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update to the latest version.".into()),
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => {
                Some("Try restoring a backup if you have one.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different store directory.".into())
            }
            Self::Unavailable { .. } => Some("Retry the save once storage is reachable.".into()),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_and_suggestion() {
        let err = PersistenceError::UnsupportedVersion {
            found: 9,
            max_supported: 1,
            key: "devices".to_string(),
        };
        assert!(err.user_message().contains("file version 9"));
        assert!(err.suggestion().is_some());

        let err = PersistenceError::Serialization {
            source: Box::new(std::io::Error::other("boom")),
        };
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_io_suggestion_depends_on_operation() {
        let read = PersistenceError::Io {
            operation: "read",
            path: PathBuf::from("a.json"),
            source: std::io::Error::other("denied"),
        };
        let write = PersistenceError::Io {
            operation: "write",
            path: PathBuf::from("a.json"),
            source: std::io::Error::other("denied"),
        };
        assert_ne!(read.suggestion(), write.suggestion());
        assert_eq!(read.to_string(), "Failed to read file: a.json");
    }

    #[test]
    fn test_user_messages_are_full_sentences() {
        let errors = [
            PersistenceError::Io {
                operation: "read",
                path: PathBuf::from("a.json"),
                source: std::io::Error::other("denied"),
            },
            PersistenceError::InvalidFormat {
                key: "devices".to_string(),
                reason: "duplicate option 'apple' in a".to_string(),
            },
            PersistenceError::Unavailable {
                reason: "disk offline".to_string(),
            },
        ];
        for err in errors {
            assert!(err.user_message().ends_with('.'), "{}", err.user_message());
        }
    }
}
