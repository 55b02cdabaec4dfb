//! User-facing notices.
//!
//! A transient notice is a toast that disappears after [`NOTICE_DURATION`].
//! A blocking notice stays until the user dismisses it.

use crate::shared::error::ClientError;
use std::time::{Duration, Instant};

/// How long a transient notice stays visible
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Auto-dismissed toast
    Transient,
    /// Modal that needs an explicit dismissal
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub tone: Tone,
    pub severity: Severity,
    shown_at: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::build(message, Tone::Success, Severity::Transient)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::build(message, Tone::Error, Severity::Transient)
    }

    pub fn blocking(message: impl Into<String>) -> Self {
        Self::build(message, Tone::Error, Severity::Blocking)
    }

    /// Notice for a failed operation, picking severity from the error class
    pub fn from_error(err: &ClientError, backend_fallback: &str, transport_fallback: &str) -> Self {
        let message = err.user_message(backend_fallback, transport_fallback);
        if err.is_blocking() {
            Self::blocking(message)
        } else {
            Self::error(message)
        }
    }

    fn build(message: impl Into<String>, tone: Tone, severity: Severity) -> Self {
        Self {
            message: message.into(),
            tone,
            severity,
            shown_at: Instant::now(),
        }
    }

    /// Transient notices expire; blocking ones never do
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.severity == Severity::Transient
            && now.saturating_duration_since(self.shown_at) >= NOTICE_DURATION
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
