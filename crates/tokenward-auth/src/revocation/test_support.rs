//! Mock token storage for unit tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::storage::{TokenAttribute, TokenStore};
use crate::types::AccessToken;
use crate::{AuthError, AuthResult};

/// Mock token storage that counts refresh-token lookups and `revoked_at`
/// writes.
pub(crate) struct MockTokenStore {
    tokens: RwLock<HashMap<Uuid, AccessToken>>,
    lookups: AtomicUsize,
    revoke_writes: RwLock<HashMap<Uuid, usize>>,
}

impl MockTokenStore {
    pub(crate) fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
            revoke_writes: RwLock::new(HashMap::new()),
        }
    }

    /// Number of `find_by_refresh_token` calls.
    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `revoked_at` writes against `id`.
    pub(crate) fn revoke_writes(&self, id: Uuid) -> usize {
        self.revoke_writes
            .read()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl TokenStore for MockTokenStore {
    async fn create(&self, token: &AccessToken) -> AuthResult<()> {
        self.tokens
            .write()
            .unwrap()
            .insert(token.id, token.detached());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<AccessToken>> {
        Ok(self.tokens.read().unwrap().get(&id).map(AccessToken::detached))
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AccessToken>> {
        Ok(self
            .tokens
            .read()
            .unwrap()
            .values()
            .find(|t| t.token == token)
            .map(AccessToken::detached))
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AuthResult<Option<AccessToken>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tokens
            .read()
            .unwrap()
            .values()
            .find(|t| t.refresh_token.as_deref() == Some(refresh_token))
            .map(AccessToken::detached))
    }

    async fn update_attribute(&self, id: Uuid, attribute: TokenAttribute) -> AuthResult<()> {
        let mut tokens = self.tokens.write().unwrap();
        let token = tokens
            .get_mut(&id)
            .ok_or_else(|| AuthError::storage(format!("AccessToken {id} not found")))?;
        if matches!(attribute, TokenAttribute::RevokedAt(_)) {
            *self.revoke_writes.write().unwrap().entry(id).or_default() += 1;
        }
        attribute.apply(token);
        Ok(())
    }
}
