//! Token revocation configuration.
//!
//! Controls when the previous refresh token in a rotation chain is revoked
//! and how long a scheduled revocation waits before it takes effect.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest grace period accepted by [`RevocationConfig::validate`].
pub const MAX_GRACE_PERIOD: Duration = Duration::from_secs(24 * 3600);

/// Revocation configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [revocation]
/// revoke_previous_refresh_token_on_use = true
/// grace_period = "30s"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevocationConfig {
    /// Defer revoking the previous refresh token until the newly issued
    /// access token is used for the first time.
    /// When disabled, the previous token is revoked as soon as the refresh
    /// grant completes.
    pub revoke_previous_refresh_token_on_use: bool,

    /// Delay applied by scheduled revocations.
    /// Zero means revocation is immediate.
    #[serde(with = "humantime_serde")]
    pub grace_period: Duration,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            revoke_previous_refresh_token_on_use: false,
            grace_period: Duration::ZERO,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl RevocationConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the grace period exceeds
    /// [`MAX_GRACE_PERIOD`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_period > MAX_GRACE_PERIOD {
            return Err(ConfigError::InvalidValue(format!(
                "grace_period must not exceed {}s",
                MAX_GRACE_PERIOD.as_secs()
            )));
        }

        Ok(())
    }

    /// Returns the grace period as a signed `time::Duration`, capped at
    /// [`MAX_GRACE_PERIOD`].
    #[must_use]
    pub fn grace_period(&self) -> time::Duration {
        let capped = self.grace_period.min(MAX_GRACE_PERIOD);
        time::Duration::new(capped.as_secs() as i64, capped.subsec_nanos() as i32)
    }
}
