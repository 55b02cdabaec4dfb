//! Client Error Types
//!
//! Every failure the client can meet falls into one of three classes:
//!
//! - **local validation** (`Validation`, `InvalidState`) - rejected before any network call
//! - **transport** (`Transport`, `Http`, `Decode`) - the request did not produce a usable reply
//! - **backend** (`Backend`) - the reply arrived but its `status` flag was not success
//!
//! Screens absorb all of them into a dismissible notice. The one exception is
//! `Location`, which is an unmet precondition and is shown as a blocking alert.
//!
//! # Usage
//!
//! ```rust
//! use attendbook::shared::error::ClientError;
//!
//! let err = ClientError::validation("code", "Please enter a 6-digit code");
//! assert_eq!(
//!     err.user_message("Invalid attendance code", "Error fetching event details"),
//!     "Please enter a 6-digit code"
//! );
//! ```

use crate::shared::config::ConfigError;
use thiserror::Error;

/// Why a geolocation sample could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission is required to mark attendance.")]
    PermissionDenied,
    #[error("Location services are disabled. Please enable location services.")]
    ServicesDisabled,
    #[error("Location not available. Please enable location services.")]
    Unavailable,
}

/// All errors surfaced by the client library
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally, no request was sent
    #[error("{message}")]
    Validation {
        /// The input that failed validation
        field: &'static str,
        /// Text shown to the user
        message: String,
    },

    /// Network failure or timeout before a reply arrived
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx reply that did not carry a status envelope
    #[error("Request failed: {status} - {message}")]
    Http {
        status: u16,
        message: String,
    },

    /// Reply arrived with a non-success `status` flag
    #[error("{}", message.as_deref().unwrap_or("Request rejected by server"))]
    Backend {
        /// The backend's own message, shown verbatim when present
        message: Option<String>,
    },

    /// Reply body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No session token is stored
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Geolocation precondition not met
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Operation invoked from a state that does not allow it
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Token store I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Create a new validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a backend failure from an optional message
    pub fn backend(message: Option<String>) -> Self {
        Self::Backend {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// True when the request never produced a usable reply
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http { .. } | Self::Decode(_))
    }

    /// True for failures that need an acknowledged alert rather than a toast
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Location(_) | Self::NotAuthenticated)
    }

    /// Text to show the user.
    ///
    /// Validation and location errors carry their own text. Backend failures
    /// show the backend message verbatim, falling back to `backend_fallback`.
    /// Transport failures always show `transport_fallback`.
    pub fn user_message(&self, backend_fallback: &str, transport_fallback: &str) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Backend { message } => message
                .clone()
                .unwrap_or_else(|| backend_fallback.to_string()),
            Self::Location(err) => err.to_string(),
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::InvalidState { .. } => self.to_string(),
            _ => transport_fallback.to_string(),
        }
    }

    /// Emit this error at the level matching its class.
    pub fn log(&self, operation: &str) {
        match self {
            Self::Backend { message } => {
                tracing::warn!(operation, message = message.as_deref().unwrap_or(""), "backend rejected request")
            }
            Self::Validation { field, message } => {
                tracing::debug!(operation, field, message = message.as_str(), "rejected locally")
            }
            err if err.is_transport() => tracing::error!(operation, error = %err, "transport failure"),
            err => tracing::warn!(operation, error = %err, "operation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = ClientError::backend(Some("Event has ended".to_string()));
        assert_eq!(err.user_message("fallback", "network"), "Event has ended");
        assert_eq!(err.to_string(), "Event has ended");
    }

    #[test]
    fn test_backend_without_message_uses_fallback() {
        let err = ClientError::backend(Some("   ".to_string()));
        assert_matches!(err, ClientError::Backend { message: None });
        assert_eq!(err.user_message("Invalid attendance code", "network"), "Invalid attendance code");
    }

    #[test]
    fn test_transport_class() {
        let decode: ClientError = serde_json::from_str::<serde_json::Value>("{ nope")
            .unwrap_err()
            .into();
        assert!(decode.is_transport());
        assert_eq!(decode.user_message("backend", "Error occurred"), "Error occurred");

        let http = ClientError::Http { status: 502, message: "Bad Gateway".into() };
        assert!(http.is_transport());
        assert!(!http.is_blocking());
    }

    #[test]
    fn test_location_is_blocking() {
        let err: ClientError = LocationError::PermissionDenied.into();
        assert!(err.is_blocking());
        assert_eq!(
            err.user_message("a", "b"),
            "Location permission is required to mark attendance."
        );
    }

    #[test]
    fn test_invalid_state_display() {
        let err = ClientError::InvalidState { operation: "mark attendance", state: "entering a code" };
        assert_eq!(err.to_string(), "Cannot mark attendance while entering a code");
    }
}
