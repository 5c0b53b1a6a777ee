//! Error types for the Mentor application.

use thiserror::Error;

/// A shared error type for the entire Mentor application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum MentorError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote chat service answered with a non-success status
    #[error("Remote service returned status {status}: {detail}")]
    RemoteStatus { status: u16, detail: String },

    /// The remote chat service could not be reached at all
    #[error("Remote service unreachable: {message}")]
    RemoteTransport { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Serialization error
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a RemoteStatus error
    pub fn remote_status(status: u16, detail: impl Into<String>) -> Self {
        Self::RemoteStatus {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a RemoteTransport error
    pub fn remote_transport(message: impl Into<String>) -> Self {
        Self::RemoteTransport {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the error came from the remote chat service,
    /// whether as a non-success status or a transport failure.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteStatus { .. } | Self::RemoteTransport { .. }
        )
    }
}

impl From<std::io::Error> for MentorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: e.to_string(),
        }
    }
}

/// Result type alias using `MentorError`.
pub type Result<T> = std::result::Result<T, MentorError>;
