//! Auth module: registration, credential checks and bearer tokens.
//!
//! Accounts live in the user repository; this module adds password hashing
//! and HS256 token issue/verification on top of it.

pub mod domain;
pub mod errors;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use service::{AuthConfig, AuthService};
