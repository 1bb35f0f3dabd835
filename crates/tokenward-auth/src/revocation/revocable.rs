//! The revocation capability shared by token records.
//!
//! A token is revoked once `revoked_at` is set and no later than the time
//! of the check. A future `revoked_at` is a scheduled revocation: the token
//! stays usable until that instant passes. Revocation is one-way; nothing in
//! this module clears `revoked_at`.
//!
//! # Refresh token rotation
//!
//! When a refresh grant issues a new record, the record remembers the
//! refresh token it replaced in `previous_refresh_token`.
//! [`Revocable::revoke_previous_refresh_token`] revokes that predecessor (if
//! it is still live) and clears the pointer, so a superseded refresh token
//! cannot be replayed.
//!
//! # Example
//!
//! ```ignore
//! use tokenward_auth::clock::SystemClock;
//! use tokenward_auth::revocation::Revocable;
//!
//! let mut token = store.find_by_token("access").await?.unwrap();
//! token.revoke(store.as_ref(), &SystemClock).await?;
//! assert!(token.is_revoked());
//! ```

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{AuthError, AuthResult};
use crate::clock::{Clock, SystemClock};
use crate::storage::{TokenAttribute, TokenStore};
use crate::types::{AccessToken, PreviousToken};

/// Revoke, schedule, and query revocation of a token record.
///
/// Implementors expose their revocation fields; the provided methods carry
/// the behavior. Every write goes through [`TokenStore::update_attribute`]
/// first and is mirrored on the in-memory record only after it succeeds.
#[async_trait]
pub trait Revocable: Send + Sync {
    /// ID used to address the record in the store.
    fn record_id(&self) -> Uuid;

    /// When the record was (or will be) revoked.
    fn revoked_at(&self) -> Option<OffsetDateTime>;

    /// Refresh token value this record superseded, or `""`.
    fn previous_refresh_token(&self) -> &str;

    /// Memoized predecessor lookup.
    fn previous_token_mut(&mut self) -> &mut PreviousToken;

    /// Mirrors a persisted attribute change on the in-memory record.
    fn apply_attribute(&mut self, attribute: &TokenAttribute);

    /// Returns `true` if the record is revoked as of `now`.
    fn is_revoked_at(&self, now: OffsetDateTime) -> bool {
        self.revoked_at().is_some_and(|at| at <= now)
    }

    /// Returns `true` if the record is revoked as of the current wall-clock
    /// time.
    fn is_revoked(&self) -> bool {
        self.is_revoked_at(SystemClock.now())
    }

    /// Revokes the record at `clock.now()`.
    ///
    /// Revoking twice overwrites the timestamp; with a non-decreasing clock
    /// the record stays revoked.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails; the in-memory record is
    /// left unchanged in that case.
    async fn revoke(&mut self, store: &dyn TokenStore, clock: &dyn Clock) -> AuthResult<()> {
        let at = clock.now();
        tracing::debug!(token_id = %self.record_id(), revoked_at = %at, "Revoking token");
        update(self, store, TokenAttribute::RevokedAt(at)).await
    }

    /// Revokes the record at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    async fn revoke_now(&mut self, store: &dyn TokenStore) -> AuthResult<()> {
        self.revoke(store, &SystemClock).await
    }

    /// Schedules revocation at `clock.now() + delay`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSchedule` without writing if the resulting
    /// time is out of range, or the store's error if the write fails.
    async fn revoke_in(
        &mut self,
        store: &dyn TokenStore,
        clock: &dyn Clock,
        delay: Duration,
    ) -> AuthResult<()> {
        let at = clock.now().checked_add(delay).ok_or_else(|| {
            AuthError::invalid_schedule(format!("revocation delay {delay} is out of range"))
        })?;
        tracing::debug!(
            token_id = %self.record_id(),
            revoked_at = %at,
            "Scheduling token revocation"
        );
        update(self, store, TokenAttribute::RevokedAt(at)).await
    }

    /// Revokes the refresh token this record replaced and clears the pointer.
    ///
    /// The predecessor is looked up once per in-memory record and the result
    /// is reused by later calls. A missing predecessor is not an error. An
    /// already-revoked predecessor is left untouched. The pointer is cleared
    /// in every case.
    ///
    /// Returns `true` if this call revoked the predecessor.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup or either write fails.
    async fn revoke_previous_refresh_token(
        &mut self,
        store: &dyn TokenStore,
        clock: &dyn Clock,
    ) -> AuthResult<bool> {
        if self.previous_token_mut().is_resolved() {
            tracing::trace!(
                token_id = %self.record_id(),
                "Previous refresh token already resolved"
            );
        } else {
            let previous = self.previous_refresh_token().to_owned();
            let found = if previous.is_empty() {
                None
            } else {
                store.find_by_refresh_token(&previous).await?
            };
            self.previous_token_mut().resolve(found);
        }

        let mut revoked = false;
        if let Some(prior) = self.previous_token_mut().get_mut()
            && !prior.is_revoked_at(clock.now())
        {
            prior.revoke(store, clock).await?;
            revoked = true;
        }

        update(self, store, TokenAttribute::PreviousRefreshToken(String::new())).await?;

        tracing::debug!(
            token_id = %self.record_id(),
            revoked_previous = revoked,
            "Processed previous refresh token"
        );
        Ok(revoked)
    }
}

async fn update<T: Revocable + ?Sized>(
    token: &mut T,
    store: &dyn TokenStore,
    attribute: TokenAttribute,
) -> AuthResult<()> {
    store
        .update_attribute(token.record_id(), attribute.clone())
        .await?;
    token.apply_attribute(&attribute);
    Ok(())
}

impl Revocable for AccessToken {
    fn record_id(&self) -> Uuid {
        self.id
    }

    fn revoked_at(&self) -> Option<OffsetDateTime> {
        self.revoked_at
    }

    fn previous_refresh_token(&self) -> &str {
        &self.previous_refresh_token
    }

    fn previous_token_mut(&mut self) -> &mut PreviousToken {
        &mut self.previous_token
    }

    fn apply_attribute(&mut self, attribute: &TokenAttribute) {
        attribute.apply(self);
    }
}
