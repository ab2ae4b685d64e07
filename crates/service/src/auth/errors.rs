use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token: {0}")]
    InvalidToken(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Service(ServiceError::Validation(_)) => 1001,
            AuthError::Service(ServiceError::Conflict(_)) => 1002,
            AuthError::Service(ServiceError::NotFound(_)) => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::InvalidToken(_) => 1005,
            AuthError::TokenError(_) => 1102,
            AuthError::Service(_) => 1200,
        }
    }
}
