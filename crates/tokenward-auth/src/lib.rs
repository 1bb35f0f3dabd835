//! # tokenward-auth
//!
//! Token revocation for an OAuth 2.0 authorization server.
//!
//! This crate provides:
//! - The access/refresh token record and its revocation state
//! - Immediate and scheduled revocation
//! - Refresh token rotation chaining (revoking the token a refresh replaced)
//! - The storage trait revocation persists through
//!
//! ## Modules
//!
//! - [`clock`] - Injectable time sources
//! - [`config`] - Revocation configuration
//! - [`error`] - Error types
//! - [`revocation`] - The `Revocable` capability and `RevocationService`
//! - [`storage`] - Storage traits for token data
//! - [`types`] - Token domain types

pub mod clock;
pub mod config;
pub mod error;
pub mod revocation;
pub mod storage;
pub mod types;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::{ConfigError, RevocationConfig};
pub use error::{AuthError, ErrorCategory};
pub use revocation::{Revocable, RevocationService};
pub use storage::{TokenAttribute, TokenStore};
pub use types::{AccessToken, PreviousToken};

/// Type alias for revocation results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use tokenward_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::clock::{Clock, MockClock, SystemClock};
    pub use crate::config::{ConfigError, RevocationConfig};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::revocation::{Revocable, RevocationService};
    pub use crate::storage::{TokenAttribute, TokenStore};
    pub use crate::types::AccessToken;
}
