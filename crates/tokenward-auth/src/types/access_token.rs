//! Access token domain type.
//!
//! An [`AccessToken`] record carries both the access token and, when one
//! was issued, its refresh token. Refresh token rotation links each new
//! record to the refresh token it replaced through
//! [`AccessToken::previous_refresh_token`].

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::revocation::Revocable;

/// Access/refresh token record as persisted by a [`TokenStore`].
///
/// [`TokenStore`]: crate::storage::TokenStore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Unique identifier for this token record.
    pub id: Uuid,

    /// The access token value.
    pub token: String,

    /// The refresh token value, if one was issued alongside the access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Value of the refresh token this record superseded.
    /// Empty when there is no predecessor or the chain was already processed.
    #[serde(default)]
    pub previous_refresh_token: String,

    /// Client ID that this token was issued to.
    pub client_id: String,

    /// Resource owner that authorized this token (None for client credentials).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_owner_id: Option<Uuid>,

    /// Granted scopes (space-separated).
    #[serde(default)]
    pub scope: String,

    /// When this token was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Lifetime in seconds (None = no expiration).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// When this token was (or will be) revoked. None = not revoked.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub revoked_at: Option<OffsetDateTime>,

    /// Memoized lookup of the token named by `previous_refresh_token`.
    #[serde(skip)]
    pub(crate) previous_token: PreviousToken,
}

impl AccessToken {
    /// Creates a new, unrevoked token record issued now.
    #[must_use]
    pub fn new(token: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: token.into(),
            refresh_token: None,
            previous_refresh_token: String::new(),
            client_id: client_id.into(),
            resource_owner_id: None,
            scope: String::new(),
            created_at: OffsetDateTime::now_utc(),
            expires_in: None,
            revoked_at: None,
            previous_token: PreviousToken::default(),
        }
    }

    /// Sets the refresh token value.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Links this token to the refresh token it replaces.
    #[must_use]
    pub fn with_previous_refresh_token(mut self, previous: impl Into<String>) -> Self {
        self.previous_refresh_token = previous.into();
        self
    }

    /// Sets the resource owner.
    #[must_use]
    pub fn with_resource_owner(mut self, owner: Uuid) -> Self {
        self.resource_owner_id = Some(owner);
        self
    }

    /// Sets the granted scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, lifetime: Duration) -> Self {
        self.expires_in = Some(lifetime.whole_seconds());
        self
    }

    /// Sets the revocation timestamp.
    #[must_use]
    pub fn with_revoked_at(mut self, revoked_at: OffsetDateTime) -> Self {
        self.revoked_at = Some(revoked_at);
        self
    }

    /// Returns a copy holding only persisted state, as a freshly loaded
    /// record would.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            previous_token: PreviousToken::default(),
            ..self.clone()
        }
    }

    /// Returns when this token expires, if it has a lifetime.
    ///
    /// A lifetime that runs past the representable range never expires.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires_in
            .and_then(|secs| self.created_at.checked_add(Duration::seconds(secs)))
    }

    /// Returns `true` if this token had expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at().is_some_and(|exp| now >= exp)
    }

    /// Returns `true` if this token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// Returns `true` if this token can be used at `now`
    /// (neither expired nor revoked).
    #[must_use]
    pub fn is_accessible_at(&self, now: OffsetDateTime) -> bool {
        !self.is_expired_at(now) && !self.is_revoked_at(now)
    }

    /// Returns `true` if this token can be used right now.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.is_accessible_at(OffsetDateTime::now_utc())
    }

    /// Returns `true` if this token still points at a refresh token it replaced.
    #[must_use]
    pub fn has_previous_refresh_token(&self) -> bool {
        !self.previous_refresh_token.is_empty()
    }
}

/// Lazily resolved predecessor of a rotated token.
///
/// Unresolved until the first lookup; afterwards holds the lookup result,
/// including a miss, for the lifetime of the in-memory record.
#[derive(Debug, Clone, Default)]
pub struct PreviousToken(Option<Option<Box<AccessToken>>>);

impl PreviousToken {
    /// Returns `true` once a lookup result has been stored.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.0.is_some()
    }

    /// Stores the lookup result.
    pub fn resolve(&mut self, token: Option<AccessToken>) {
        self.0 = Some(token.map(Box::new));
    }

    /// Returns the resolved token mutably, if the lookup found one.
    pub fn get_mut(&mut self) -> Option<&mut AccessToken> {
        self.0.as_mut().and_then(|t| t.as_deref_mut())
    }
}
