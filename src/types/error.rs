//! Error types for Launchpad
//!
//! Local errors (validation, transition, authorization, not-found, stale
//! write) fail the triggering request synchronously. Integration errors from
//! downstream services never reach the caller of a domain operation; the
//! dispatcher absorbs and logs them.

/// Main error type for Launchpad operations
#[derive(Debug, thiserror::Error)]
pub enum LaunchpadError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaunchpadError {
    /// Build an invalid-transition error from any pair of status values
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// HTTP status code for this error, for the external routing layer
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidTransition { .. } => 409,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) => 503,
            Self::Integration(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for LaunchpadError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for LaunchpadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("JSON error: {}", err))
    }
}

impl From<mongodb::error::Error> for LaunchpadError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for LaunchpadError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Internal(format!("BSON encode error: {}", err))
    }
}

impl From<bson::de::Error> for LaunchpadError {
    fn from(err: bson::de::Error) -> Self {
        Self::Internal(format!("BSON decode error: {}", err))
    }
}

impl From<bson::oid::Error> for LaunchpadError {
    fn from(err: bson::oid::Error) -> Self {
        Self::Validation(format!("Invalid id: {}", err))
    }
}

impl From<reqwest::Error> for LaunchpadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Integration(err.to_string())
    }
}

/// Result type alias for Launchpad operations
pub type Result<T> = std::result::Result<T, LaunchpadError>;
