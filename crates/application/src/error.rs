//! Application-level errors

use thiserror::Error;

/// Message used when callers do not supply one
pub const DEFAULT_INJECTED_MESSAGE: &str = "injected failure";

/// Error synthesized when a fault key decides to fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (fault key: {key})")]
pub struct InjectedError {
    /// Fault key that triggered
    pub key: String,
    /// Human-readable failure description
    pub message: String,
}

impl InjectedError {
    /// Create an injected error for `key`
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an injected error with the default message
    pub fn generic(key: impl Into<String>) -> Self {
        Self::new(key, DEFAULT_INJECTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_key_and_message() {
        let err = InjectedError::new("db-connect", "connection refused");
        assert_eq!(err.to_string(), "connection refused (fault key: db-connect)");
    }

    #[test]
    fn generic_uses_default_message() {
        let err = InjectedError::generic("api");
        assert_eq!(err.message, DEFAULT_INJECTED_MESSAGE);
        assert_eq!(err.key, "api");
    }
}
