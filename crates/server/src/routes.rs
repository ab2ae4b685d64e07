pub mod auth;
pub mod bookings;
pub mod hotels;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Full application router. Every route except the public table in
/// [`auth::is_public`] goes through the token middleware.
pub fn build_router(state: ServerState, cors: CorsLayer, max_upload_bytes: usize) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let user_routes = Router::new()
        .route("/user", get(users::list).post(users::create))
        .route("/user/search/:query", get(users::search))
        .route("/user/:id", get(users::get).patch(users::update).delete(users::delete));

    let hotel_routes = Router::new()
        .route("/hotel", get(hotels::list).post(hotels::create))
        .route("/hotel/search/:query", get(hotels::search))
        .route("/hotel/:id", get(hotels::get).patch(hotels::update).delete(hotels::delete));

    let booking_routes = Router::new()
        .route("/booking", get(bookings::list).post(bookings::create))
        .route("/booking/user/:id", get(bookings::list_for_user))
        .route("/booking/:id", get(bookings::get).patch(bookings::update).delete(bookings::delete));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(user_routes)
        .merge(hotel_routes)
        .merge(booking_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
