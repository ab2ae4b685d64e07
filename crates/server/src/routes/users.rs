use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use models::user;
use service::pagination::Pagination;
use service::user::{CreateUserInput, UpdateUserInput};
use service::Actor;

use super::auth::ServerState;
use crate::errors::JsonApiError;

#[utoipa::path(post, path = "/user", tag = "user", request_body = crate::openapi::CreateUserRequest, responses((status = 201, description = "Created", body = crate::openapi::UserDoc), (status = 403, description = "Admin only"), (status = 409, description = "Email taken")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Json(input), _): WithRejection<Json<CreateUserInput>, JsonApiError>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    let created = state.users.create(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/user", tag = "user", params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "1..=100")), responses((status = 200, description = "Users", body = [crate::openapi::UserDoc]), (status = 403, description = "Admin only")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, JsonApiError>,
) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    let users = state.users.list(&actor, page).await?;
    info!(count = users.len(), "list users");
    Ok(Json(users))
}

#[utoipa::path(get, path = "/user/search/{query}", tag = "user", params(("query" = String, Path, description = "Substring of email, first or last name")), responses((status = 200, description = "Matches", body = [crate::openapi::UserDoc]), (status = 403, description = "Admin only")))]
pub async fn search(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(query): Path<String>,
) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(state.users.search(&actor, &query).await?))
}

#[utoipa::path(get, path = "/user/{id}", tag = "user", params(("id" = Uuid, Path, description = "User id")), responses((status = 200, description = "User", body = crate::openapi::UserDoc), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.get(&actor, id).await?))
}

#[utoipa::path(patch, path = "/user/{id}", tag = "user", params(("id" = Uuid, Path, description = "User id")), request_body = crate::openapi::UpdateUserRequest, responses((status = 200, description = "Updated", body = crate::openapi::UserDoc), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"), (status = 409, description = "Email taken")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateUserInput>, JsonApiError>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.update(&actor, id, input).await?))
}

#[utoipa::path(delete, path = "/user/{id}", tag = "user", params(("id" = Uuid, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> Result<StatusCode, JsonApiError> {
    state.users.remove(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
