//! Token storage trait.
//!
//! This module defines the storage interface that revocation persists
//! through. Revocation only ever changes one attribute at a time, so the
//! write side of the contract is a single-attribute update.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::types::AccessToken;

/// A single persisted attribute change on a token record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAttribute {
    /// Sets `revoked_at`.
    RevokedAt(OffsetDateTime),
    /// Sets `previous_refresh_token`.
    PreviousRefreshToken(String),
}

impl TokenAttribute {
    /// Returns the persisted field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::RevokedAt(_) => "revoked_at",
            Self::PreviousRefreshToken(_) => "previous_refresh_token",
        }
    }

    /// Applies this change to an in-memory record.
    pub fn apply(&self, token: &mut AccessToken) {
        match self {
            Self::RevokedAt(at) => token.revoked_at = Some(*at),
            Self::PreviousRefreshToken(value) => token.previous_refresh_token.clone_from(value),
        }
    }
}

/// Storage trait for access/refresh token records.
///
/// # Implementations
///
/// - `tokenward-auth-memory` - in-memory storage backend
///
/// # Example Implementation
///
/// ```ignore
/// use tokenward_auth::storage::{TokenAttribute, TokenStore};
/// use tokenward_auth::{AccessToken, AuthError, AuthResult};
///
/// struct MapTokenStore {
///     tokens: std::sync::RwLock<std::collections::HashMap<uuid::Uuid, AccessToken>>,
/// }
///
/// #[async_trait::async_trait]
/// impl TokenStore for MapTokenStore {
///     async fn update_attribute(&self, id: uuid::Uuid, attr: TokenAttribute) -> AuthResult<()> {
///         let mut tokens = self.tokens.write().unwrap();
///         let token = tokens
///             .get_mut(&id)
///             .ok_or_else(|| AuthError::storage(format!("AccessToken {id} not found")))?;
///         attr.apply(token);
///         Ok(())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Stores a new token record.
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same ID already exists or the
    /// storage is unavailable.
    async fn create(&self, token: &AccessToken) -> AuthResult<()>;

    /// Finds a token record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<AccessToken>>;

    /// Finds a token record by its access token value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AccessToken>>;

    /// Finds the token record whose refresh token equals `refresh_token`.
    ///
    /// Returns tokens regardless of revocation status. A miss is `Ok(None)`,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_refresh_token(&self, refresh_token: &str)
    -> AuthResult<Option<AccessToken>>;

    /// Persists a single attribute change on the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the write fails.
    async fn update_attribute(&self, id: Uuid, attribute: TokenAttribute) -> AuthResult<()>;
}
