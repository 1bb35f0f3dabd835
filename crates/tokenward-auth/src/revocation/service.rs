//! Revocation service.
//!
//! Binds the [`Revocable`] operations to a token store, a clock, and the
//! revocation configuration so that grant handlers and middleware do not
//! have to thread them through every call.
//!
//! # Usage
//!
//! ```ignore
//! use tokenward_auth::revocation::RevocationService;
//!
//! let service = RevocationService::new(store, RevocationConfig::default())?;
//!
//! // Refresh grant issued `new_token` in place of an older refresh token.
//! service.on_refresh(&mut new_token).await?;
//! ```

use std::sync::Arc;

use time::Duration;

use crate::AuthResult;
use crate::clock::{Clock, SystemClock};
use crate::config::RevocationConfig;
use crate::revocation::Revocable;
use crate::storage::TokenStore;
use crate::types::AccessToken;

/// Service for revoking tokens and processing refresh token rotation.
pub struct RevocationService {
    /// Token storage.
    store: Arc<dyn TokenStore>,

    /// Time source for revocation timestamps and checks.
    clock: Arc<dyn Clock>,

    /// Service configuration.
    config: RevocationConfig,
}

impl RevocationService {
    /// Creates a new revocation service using the system clock.
    ///
    /// # Arguments
    ///
    /// * `store` - Storage for token records
    /// * `config` - Revocation configuration
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if `config` fails validation.
    pub fn new(store: Arc<dyn TokenStore>, config: RevocationConfig) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns `true` if `token` is revoked according to the service clock.
    #[must_use]
    pub fn is_revoked(&self, token: &AccessToken) -> bool {
        token.is_revoked_at(self.clock.now())
    }

    /// Revokes `token` immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn revoke(&self, token: &mut AccessToken) -> AuthResult<()> {
        token.revoke(self.store.as_ref(), self.clock.as_ref()).await
    }

    /// Schedules revocation of `token` after `delay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn revoke_in(&self, token: &mut AccessToken, delay: Duration) -> AuthResult<()> {
        token
            .revoke_in(self.store.as_ref(), self.clock.as_ref(), delay)
            .await
    }

    /// Revokes `token` after the configured grace period.
    ///
    /// A zero grace period revokes immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduled time is out of range or the store
    /// write fails.
    pub async fn revoke_with_grace_period(&self, token: &mut AccessToken) -> AuthResult<()> {
        let grace = self.config.grace_period();
        if grace.is_zero() {
            self.revoke(token).await
        } else {
            self.revoke_in(token, grace).await
        }
    }

    /// Processes rotation after a refresh grant issued `new_token`.
    ///
    /// Revokes the previous refresh token right away unless the configuration
    /// defers it until `new_token` is first used.
    ///
    /// Returns `true` if the previous token was revoked by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub async fn on_refresh(&self, new_token: &mut AccessToken) -> AuthResult<bool> {
        if self.config.revoke_previous_refresh_token_on_use {
            tracing::debug!(
                token_id = %new_token.id,
                "Deferring previous refresh token revocation until first use"
            );
            return Ok(false);
        }

        self.revoke_previous(new_token).await
    }

    /// Processes rotation when `token` is used to access a resource.
    ///
    /// Only acts when revocation is deferred until first use and the token
    /// still points at a predecessor.
    ///
    /// Returns `true` if the previous token was revoked by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub async fn on_token_used(&self, token: &mut AccessToken) -> AuthResult<bool> {
        if !self.config.revoke_previous_refresh_token_on_use || !token.has_previous_refresh_token()
        {
            return Ok(false);
        }

        self.revoke_previous(token).await
    }

    /// Revokes the token whose refresh token equals `refresh_token`.
    ///
    /// Unknown and already-revoked tokens are not errors.
    ///
    /// Returns `true` if a token was revoked by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    pub async fn revoke_by_refresh_token(&self, refresh_token: &str) -> AuthResult<bool> {
        let Some(mut token) = self.store.find_by_refresh_token(refresh_token).await? else {
            tracing::debug!("Refresh token not found, nothing to revoke");
            return Ok(false);
        };

        if self.is_revoked(&token) {
            return Ok(false);
        }

        self.revoke(&mut token).await?;
        Ok(true)
    }

    async fn revoke_previous(&self, token: &mut AccessToken) -> AuthResult<bool> {
        token
            .revoke_previous_refresh_token(self.store.as_ref(), self.clock.as_ref())
            .await
    }
}
