use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{info, debug, instrument};
use uuid::Uuid;

use models::user::{self, Role};
use crate::access::Actor;
use crate::user::{CreateUserInput, UserService};
use super::domain::{AuthSession, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: Duration::hours(token_ttl_hours) }
    }

    pub fn from_settings(settings: &configs::AuthSettings) -> Self {
        Self::new(settings.jwt_secret.clone(), settings.token_ttl_hours)
    }
}

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(users: UserService, cfg: AuthConfig) -> Self { Self { users, cfg } }

    /// Register a new account with role `user`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthConfig, AuthService, domain::RegisterInput};
    /// use service::{mock::MockStore, user::UserService};
    /// let users = UserService::new(Arc::new(MockStore::default()));
    /// let svc = AuthService::new(users, AuthConfig::new("secret", 12));
    /// let input = RegisterInput {
    ///     firstname: "Test".into(), lastname: "User".into(), email: "user@example.com".into(),
    ///     pseudo: "tester".into(), password: "Secret123".into(),
    /// };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_eq!(user.role, models::user::Role::User);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, AuthError> {
        let created = self
            .users
            .insert(
                CreateUserInput {
                    firstname: input.firstname,
                    lastname: input.lastname,
                    email: input.email,
                    pseudo: input.pseudo,
                    password: input.password,
                    role: None,
                },
                Role::User,
            )
            .await?;
        info!(user_id = %created.id, "user_registered");
        Ok(created)
    }

    /// Check credentials and issue a token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthConfig, AuthService, domain::{LoginInput, RegisterInput}};
    /// use service::{mock::MockStore, user::UserService};
    /// let users = UserService::new(Arc::new(MockStore::default()));
    /// let svc = AuthService::new(users, AuthConfig::new("secret", 12));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     firstname: "N".into(), lastname: "Name".into(), email: "u@e.com".into(),
    ///     pseudo: "nn".into(), password: "Passw0rd".into(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .repository()
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify(&input.password, &user.password_hash)? {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { token, user })
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.cfg.token_ttl).timestamp(),
        };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and check signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Actor, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(Actor::new(id, data.claims.email, data.claims.role))
    }
}
