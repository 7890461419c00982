//! Error types for the Spotai game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::GamePhase;

/// A shared error type for the entire Spotai workspace.
///
/// Remote and cache failures are represented here so that callers can log
/// them uniformly, but none of them is meant to reach the player: the
/// application layer degrades to stale or empty data instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SpotaiError {
    /// An action was attempted in a phase that does not accept it
    #[error("Invalid phase: cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: GamePhase,
    },

    /// A choice arrived while the previous one is still being processed
    #[error("Choice for round {round_number} is already being processed")]
    ChoiceLocked { round_number: u32 },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote store answered with a non-success status
    #[error("Remote store error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// A remote call did not finish within the request timeout
    #[error("Timed out after {millis} ms: {operation}")]
    Timeout { operation: String, millis: u64 },

    /// Data access error (transport failures, unexpected payloads)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// The round deck cannot be played
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpotaiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidPhase error
    pub fn invalid_phase(action: &'static str, phase: GamePhase) -> Self {
        Self::InvalidPhase { action, phase }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Remote error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            millis: timeout.as_millis() as u64,
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an InvalidDeck error
    pub fn invalid_deck(message: impl Into<String>) -> Self {
        Self::InvalidDeck(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error rejects player input rather than reporting a failure
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::InvalidPhase { .. } | Self::ChoiceLocked { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error came from talking to the remote store
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::Timeout { .. } | Self::DataAccess(_)
        )
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SpotaiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SpotaiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SpotaiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SpotaiError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SpotaiError>`.
pub type Result<T> = std::result::Result<T, SpotaiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rejected_input_predicates() {
        assert!(SpotaiError::invalid_phase("choose", GamePhase::Complete).is_rejected_input());
        assert!(SpotaiError::ChoiceLocked { round_number: 1 }.is_rejected_input());
        assert!(!SpotaiError::internal("boom").is_rejected_input());
    }

    #[test]
    fn test_remote_predicates() {
        let timeout = SpotaiError::timeout("fetch round stats", Duration::from_secs(5));
        assert!(timeout.is_timeout());
        assert!(timeout.is_remote());
        assert!(SpotaiError::remote(503, "unavailable").is_remote());
        assert!(!SpotaiError::config("bad").is_remote());
        assert_eq!(
            timeout.to_string(),
            "Timed out after 5000 ms: fetch round stats"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err: SpotaiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_serialization());
    }
}
