//! crates/api-adapters/src/lib.rs
//!
//! HTTP surface for StackIt. The axum router lives behind the `web-axum`
//! feature.

#[cfg(feature = "web-axum")]
pub mod web;

#[cfg(feature = "web-axum")]
pub use web::{router, AppState, CookieSettings};
