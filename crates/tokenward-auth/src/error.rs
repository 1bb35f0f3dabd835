//! Token revocation error types.
//!
//! This module defines the errors that can surface from revocation
//! operations and from the token store they persist through.

use std::fmt;

/// Errors that can occur during token revocation operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A scheduled revocation time cannot be represented.
    #[error("Invalid revocation schedule: {message}")]
    InvalidSchedule {
        /// Description of the rejected schedule.
        message: String,
    },

    /// An error occurred while storing or retrieving token data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The revocation configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidSchedule` error.
    #[must_use]
    pub fn invalid_schedule(message: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Configuration { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSchedule { .. } => ErrorCategory::Request,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

impl From<crate::config::ConfigError> for AuthError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

/// Categories of revocation errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller-supplied values the operation cannot honor.
    Request,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}
