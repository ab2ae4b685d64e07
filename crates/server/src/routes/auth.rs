use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use models::user;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::{AuthConfig, AuthService};
use service::booking::{BookingRepository, BookingService, SeaOrmBookingRepository};
use service::hotel::{HotelRepository, HotelService, SeaOrmHotelRepository};
use service::image_host::ImageHost;
use service::mock::MockStore;
use service::user::{SeaOrmUserRepository, UserRepository, UserService};
use service::Actor;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state: one service per resource.
#[derive(Clone)]
pub struct ServerState {
    pub auth: AuthService,
    pub users: UserService,
    pub hotels: HotelService,
    pub bookings: BookingService,
}

impl ServerState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hotels: Arc<dyn HotelRepository>,
        bookings: Arc<dyn BookingRepository>,
        images: Arc<dyn ImageHost>,
        auth: AuthConfig,
    ) -> Self {
        let user_svc = UserService::new(users.clone());
        Self {
            auth: AuthService::new(user_svc.clone(), auth),
            users: user_svc,
            hotels: HotelService::new(hotels.clone(), images),
            bookings: BookingService::new(bookings, users, hotels),
        }
    }

    pub fn with_seaorm(db: DatabaseConnection, images: Arc<dyn ImageHost>, auth: AuthConfig) -> Self {
        Self::new(
            Arc::new(SeaOrmUserRepository { db: db.clone() }),
            Arc::new(SeaOrmHotelRepository { db: db.clone() }),
            Arc::new(SeaOrmBookingRepository { db }),
            images,
            auth,
        )
    }

    /// Everything backed by one [`MockStore`].
    pub fn in_memory(store: Arc<MockStore>, images: Arc<dyn ImageHost>, auth: AuthConfig) -> Self {
        Self::new(store.clone(), store.clone(), store, images, auth)
    }
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub user: user::Model,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::UserDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): WithRejection<Json<RegisterInput>, JsonApiError>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    let created = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = crate::openapi::LoginResponseDoc), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, JsonApiError>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    Ok((jar, Json(LoginOutput { token: session.token, user: session.user })))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared"), (status = 401, description = "Unauthorized")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current user", body = crate::openapi::UserDoc), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.current(&actor).await?))
}

/// Routes reachable without a token.
pub fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    match path {
        "/health" => true,
        "/auth/login" | "/auth/register" => method == Method::POST,
        p if p.starts_with("/docs") || p.starts_with("/api-docs") => true,
        p if p == "/hotel" || p.starts_with("/hotel/") => method == Method::GET,
        _ => false,
    }
}

/// `Authorization: Bearer <jwt>`, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<String, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        let value = h.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
        return match value.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => Err(JsonApiError::unauthorized("expected a Bearer token")),
        };
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("missing bearer token"))
}

/// Global middleware: verifies the token on every non-public route and
/// stores the decoded [`Actor`] in request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = extract_token(&req).inspect_err(|_| {
        tracing::warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
    })?;
    let actor = state.auth.verify_token(&token).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
        JsonApiError::from(e)
    })?;
    tracing::debug!(actor_id = %actor.id, role = %actor.role, "authenticated");
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_route_table() {
        assert!(is_public(&Method::GET, "/health"));
        assert!(is_public(&Method::POST, "/auth/login"));
        assert!(is_public(&Method::POST, "/auth/register"));
        assert!(is_public(&Method::GET, "/hotel"));
        assert!(is_public(&Method::GET, "/hotel/search/sea"));
        assert!(is_public(&Method::GET, "/docs/"));
        assert!(is_public(&Method::OPTIONS, "/booking"));

        assert!(!is_public(&Method::POST, "/hotel"));
        assert!(!is_public(&Method::DELETE, "/hotel/abc"));
        assert!(!is_public(&Method::GET, "/auth/me"));
        assert!(!is_public(&Method::POST, "/auth/logout"));
        assert!(!is_public(&Method::GET, "/booking"));
        assert!(!is_public(&Method::GET, "/hotels-admin"));
    }
}
