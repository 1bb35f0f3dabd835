//! Storage traits for token data.
//!
//! # Implementations
//!
//! Storage implementations are provided in separate crates:
//!
//! - `tokenward-auth-memory` - in-memory storage backend

pub mod token;

pub use token::{TokenAttribute, TokenStore};
