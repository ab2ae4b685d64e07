use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use models::booking;
use service::booking::{CreateBookingInput, UpdateBookingInput};
use service::pagination::Pagination;
use service::Actor;

use super::auth::ServerState;
use crate::errors::JsonApiError;

#[utoipa::path(post, path = "/booking", tag = "booking", request_body = crate::openapi::CreateBookingRequest, responses((status = 201, description = "Created", body = crate::openapi::BookingDoc), (status = 403, description = "Booking for another user"), (status = 404, description = "Hotel or user not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Json(input), _): WithRejection<Json<CreateBookingInput>, JsonApiError>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    let created = state.bookings.create(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/booking", tag = "booking", params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "1..=100")), responses((status = 200, description = "All bookings for admins, own bookings otherwise", body = [crate::openapi::BookingDoc])))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, JsonApiError>,
) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    let bookings = state.bookings.list(&actor, page).await?;
    info!(count = bookings.len(), "list bookings");
    Ok(Json(bookings))
}

#[utoipa::path(get, path = "/booking/user/{id}", tag = "booking", params(("id" = Uuid, Path, description = "User id"), ("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "1..=100")), responses((status = 200, description = "Bookings of the user", body = [crate::openapi::BookingDoc]), (status = 403, description = "Forbidden")))]
pub async fn list_for_user(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, JsonApiError>,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, JsonApiError>,
) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    Ok(Json(state.bookings.list_for_user(&actor, user_id, page).await?))
}

#[utoipa::path(get, path = "/booking/{id}", tag = "booking", params(("id" = Uuid, Path, description = "Booking id")), responses((status = 200, description = "Booking", body = crate::openapi::BookingDoc), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> Result<Json<booking::Model>, JsonApiError> {
    Ok(Json(state.bookings.get(&actor, id).await?))
}

#[utoipa::path(patch, path = "/booking/{id}", tag = "booking", params(("id" = Uuid, Path, description = "Booking id")), request_body = crate::openapi::UpdateBookingRequest, responses((status = 200, description = "Updated", body = crate::openapi::BookingDoc), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateBookingInput>, JsonApiError>,
) -> Result<Json<booking::Model>, JsonApiError> {
    Ok(Json(state.bookings.update(&actor, id, input).await?))
}

#[utoipa::path(delete, path = "/booking/{id}", tag = "booking", params(("id" = Uuid, Path, description = "Booking id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> Result<StatusCode, JsonApiError> {
    state.bookings.remove(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
