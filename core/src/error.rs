//! Error types reported by the runtime entry point and backend adapters.
//!
//! Only *environment* failures are values. Structural misuse of controls and
//! handler contract violations are programming errors and panic at the
//! offending call instead.

use thiserror::Error;

/// Failure reported by [`dispatch::run`](crate::dispatch::run).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backend could not initialise the native toolkit. The application
    /// routine was not invoked.
    #[error("failed to initialise the native toolkit: {0}")]
    Init(#[from] BackendError),
    /// A runtime is already active in this process. The application routine
    /// was not invoked.
    #[error("the UI runtime is already running in this process")]
    AlreadyRunning,
}

/// Error raised by a [`Backend`](crate::Backend) adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Creates a backend error carrying a human-readable description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the description supplied by the backend.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_wraps_backend_message() {
        let err = Error::from(BackendError::new("no display"));
        assert_eq!(
            err.to_string(),
            "failed to initialise the native toolkit: no display"
        );
    }
}
