//! Token domain types.
//!
//! - [`AccessToken`] - Access token record with optional refresh token
//! - [`PreviousToken`] - Memoized predecessor lookup for rotated tokens

pub mod access_token;

pub use access_token::{AccessToken, PreviousToken};
