//! Token revocation and refresh token rotation.
//!
//! This module provides:
//!
//! - [`Revocable`] - revoke, schedule, and query revocation on a token record
//! - [`RevocationService`] - store/clock/config-bound revocation entry points

pub mod revocable;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use revocable::Revocable;
pub use service::RevocationService;
