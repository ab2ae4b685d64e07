//! Argon2id password hashing with a random per-password salt.

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

pub fn hash(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify(plain: &str, stored: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ServiceError::Internal(format!("stored hash unreadable: {}", e)))?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}
