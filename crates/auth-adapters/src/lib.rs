//! crates/auth-adapters/src/lib.rs
//!
//! Credential hashing and session token adapters.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessionTokens;
