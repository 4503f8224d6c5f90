//! Error types for Peerguard

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, AclError>;

/// Errors raised while configuring an access controller.
///
/// Evaluation never fails: every error here happens at configuration time.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("Invalid peer pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AclError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        AclError::InvalidPattern { pattern: pattern.to_string(), reason: reason.into() }
    }

    /// True when the error comes from an unparseable peer pattern
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, AclError::InvalidPattern { .. })
    }
}
