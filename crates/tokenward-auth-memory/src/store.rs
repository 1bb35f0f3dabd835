//! In-memory token store.
//!
//! Records are keyed by ID. Access and refresh token values are indexed so
//! that value lookups do not scan. Neither value changes after creation,
//! because attribute updates only touch revocation state.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use tokenward_auth::storage::{TokenAttribute, TokenStore};
use tokenward_auth::{AccessToken, AuthError, AuthResult};

/// In-memory token store using DashMap.
///
/// Records are stored without in-memory state (see
/// [`AccessToken::detached`]), so every lookup yields a fresh record.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    /// Records by ID
    tokens: DashMap<Uuid, AccessToken>,
    /// Access token value -> record ID
    by_token: DashMap<String, Uuid>,
    /// Refresh token value -> record ID
    by_refresh_token: DashMap<String, Uuid>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            by_token: DashMap::new(),
            by_refresh_token: DashMap::new(),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn get(&self, id: &Uuid) -> Option<AccessToken> {
        self.tokens.get(id).map(|entry| entry.value().detached())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn create(&self, token: &AccessToken) -> AuthResult<()> {
        // Every slot stays locked until all three are known to be free.
        let Entry::Vacant(record) = self.tokens.entry(token.id) else {
            return Err(AuthError::storage(format!(
                "AccessToken with id '{}' already exists",
                token.id
            )));
        };
        let Entry::Vacant(value) = self.by_token.entry(token.token.clone()) else {
            return Err(AuthError::storage("AccessToken value already exists"));
        };
        let refresh = match &token.refresh_token {
            Some(refresh) => match self.by_refresh_token.entry(refresh.clone()) {
                Entry::Vacant(slot) => Some(slot),
                Entry::Occupied(_) => {
                    return Err(AuthError::storage("Refresh token value already exists"));
                }
            },
            None => None,
        };

        if let Some(slot) = refresh {
            slot.insert(token.id);
        }
        value.insert(token.id);
        record.insert(token.detached());

        tracing::trace!(token_id = %token.id, "Stored token");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<AccessToken>> {
        Ok(self.get(&id))
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AccessToken>> {
        let id = self.by_token.get(token).map(|entry| *entry.value());
        Ok(id.and_then(|id| self.get(&id)))
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AuthResult<Option<AccessToken>> {
        let id = self
            .by_refresh_token
            .get(refresh_token)
            .map(|entry| *entry.value());
        Ok(id.and_then(|id| self.get(&id)))
    }

    async fn update_attribute(&self, id: Uuid, attribute: TokenAttribute) -> AuthResult<()> {
        let mut entry = self
            .tokens
            .get_mut(&id)
            .ok_or_else(|| AuthError::storage(format!("AccessToken {id} not found")))?;
        attribute.apply(entry.value_mut());

        tracing::trace!(token_id = %id, field = attribute.field(), "Updated token attribute");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::OffsetDateTime;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryTokenStore::new();
        let token = AccessToken::new("access", "client").with_refresh_token("refresh");
        store.create(&token).await.unwrap();

        assert_eq!(store.len(), 1);
        let by_id = store.find_by_id(token.id).await.unwrap().unwrap();
        assert_eq!(by_id.token, "access");

        let by_token = store.find_by_token("access").await.unwrap().unwrap();
        assert_eq!(by_token.id, token.id);

        let by_refresh = store.find_by_refresh_token("refresh").await.unwrap().unwrap();
        assert_eq!(by_refresh.id, token.id);
    }

    #[tokio::test]
    async fn test_lookup_misses() {
        let store = InMemoryTokenStore::new();
        assert!(store.is_empty());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.find_by_token("nope").await.unwrap().is_none());
        assert!(store.find_by_refresh_token("nope").await.unwrap().is_none());
        assert!(store.find_by_refresh_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryTokenStore::new();
        let token = AccessToken::new("access", "client");
        store.create(&token).await.unwrap();

        let err = store.create(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_duplicate_refresh_token_is_rejected() {
        let store = InMemoryTokenStore::new();
        store
            .create(&AccessToken::new("a1", "client").with_refresh_token("refresh"))
            .await
            .unwrap();

        let err = store
            .create(&AccessToken::new("a2", "client").with_refresh_token("refresh"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_attribute() {
        let store = InMemoryTokenStore::new();
        let token = AccessToken::new("access", "client").with_previous_refresh_token("old");
        store.create(&token).await.unwrap();

        let now = OffsetDateTime::now_utc();
        store
            .update_attribute(token.id, TokenAttribute::RevokedAt(now))
            .await
            .unwrap();
        store
            .update_attribute(token.id, TokenAttribute::PreviousRefreshToken(String::new()))
            .await
            .unwrap();

        let stored = store.find_by_id(token.id).await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, Some(now));
        assert!(stored.previous_refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let store = InMemoryTokenStore::new();
        let err = store
            .update_attribute(
                Uuid::new_v4(),
                TokenAttribute::RevokedAt(OffsetDateTime::now_utc()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_store_one_record() {
        let store = Arc::new(InMemoryTokenStore::new());
        let token = AccessToken::new("access", "client").with_refresh_token("refresh");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let token = token.clone();
                tokio::spawn(async move { store.create(&token).await.is_ok() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_claim_refresh_value_once() {
        let store = Arc::new(InMemoryTokenStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let token =
                    AccessToken::new(format!("access-{i}"), "client").with_refresh_token("refresh");
                tokio::spawn(async move { store.create(&token).await.is_ok() })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.by_token.len(), 1);
        assert!(store.find_by_refresh_token("refresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejected_create_leaves_no_index_entries() {
        let store = InMemoryTokenStore::new();
        store
            .create(&AccessToken::new("a1", "client").with_refresh_token("refresh"))
            .await
            .unwrap();

        store
            .create(&AccessToken::new("a2", "client").with_refresh_token("refresh"))
            .await
            .unwrap_err();

        assert!(store.find_by_token("a2").await.unwrap().is_none());
    }
}
