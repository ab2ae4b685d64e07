use serde::{Deserialize, Serialize};

use models::user::{self, Role};

/// Self-registration input. Any role sent by the client is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub pseudo: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login result: signed token plus the public user view.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: user::Model,
}

/// JWT payload. `sub` is the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
