//! Error types for the Realty client.

use std::time::Duration;

use thiserror::Error;

/// A shared error type for the entire Realty client.
///
/// Transport and payload failures end up here before the session controller
/// collapses them into a single user-facing `SessionState::Error` message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealtyError {
    /// The request could not be completed (connection refused, non-2xx status,
    /// service error envelope).
    #[error("Transport failure: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The response body is not a well-formed structured object.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// IO error (config file, dataset file)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RealtyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Transport error for a failed HTTP status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the request failed before a usable body arrived.
    ///
    /// Timeouts count as transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Check if this is a malformed response error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Human-readable notice shown to the user when an analysis fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => {
                format!("Error fetching analysis. Check backend! ({self})")
            }
            Self::MalformedResponse(_) => {
                format!("The analysis service returned an unreadable response. ({self})")
            }
            _ => self.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RealtyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RealtyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RealtyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RealtyError>`.
pub type Result<T> = std::result::Result<T, RealtyError>;
