//! In-memory token storage backend for tokenward-auth.
//!
//! This crate provides an in-memory implementation of the `TokenStore`
//! trait from `tokenward-auth`, using DashMap for concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokenward_auth::{AccessToken, RevocationConfig, RevocationService, TokenStore};
//! use tokenward_auth_memory::InMemoryTokenStore;
//!
//! let store = Arc::new(InMemoryTokenStore::new());
//! store.create(&AccessToken::new("access", "my-app").with_refresh_token("refresh")).await?;
//!
//! let service = RevocationService::new(store, RevocationConfig::default())?;
//! service.revoke_by_refresh_token("refresh").await?;
//! ```

pub mod store;

pub use store::InMemoryTokenStore;

/// Type alias for a shareable token store.
pub type DynTokenStore = std::sync::Arc<dyn tokenward_auth::TokenStore>;

/// Creates a new in-memory token store.
pub fn create_token_store() -> DynTokenStore {
    std::sync::Arc::new(InMemoryTokenStore::new())
}
