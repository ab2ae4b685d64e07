use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use models::hotel;
use service::hotel::{CreateHotelInput, ListHotelsQuery, UpdateHotelInput};
use service::image_host::ImageFile;
use service::Actor;

use super::auth::ServerState;
use crate::errors::JsonApiError;

/// Multipart field carrying image files.
pub const IMAGES_FIELD: &str = "images";

/// Text fields and files of a hotel form.
#[derive(Debug, Default)]
struct HotelForm {
    fields: HashMap<String, String>,
    images: Vec<ImageFile>,
}

impl HotelForm {
    async fn read(mut mp: Multipart) -> Result<Self, JsonApiError> {
        let mut form = HotelForm::default();
        while let Some(field) = mp.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGES_FIELD || field.file_name().is_some() {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // browsers send an empty part when no file is picked
                if !bytes.is_empty() {
                    form.images.push(ImageFile { file_name, content_type, bytes: bytes.to_vec() });
                }
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Non-blank text value of `key`.
    fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, JsonApiError> {
        self.text(key).ok_or_else(|| JsonApiError::bad_request(format!("{} is required", key)))
    }

    fn price(&self) -> Result<Option<f64>, JsonApiError> {
        match self.text("price") {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| JsonApiError::bad_request("price must be a number")),
            None => Ok(None),
        }
    }

    fn into_create(self) -> Result<(CreateHotelInput, Vec<ImageFile>), JsonApiError> {
        let input = CreateHotelInput {
            name: self.required("name")?,
            street: self.text("street"),
            location: self.required("location")?,
            description: self.required("description")?,
            price: self.price()?.ok_or_else(|| JsonApiError::bad_request("price is required"))?,
        };
        Ok((input, self.images))
    }

    fn into_update(self) -> Result<(UpdateHotelInput, Vec<ImageFile>), JsonApiError> {
        let input = UpdateHotelInput {
            name: self.text("name"),
            street: self.text("street"),
            location: self.text("location"),
            description: self.text("description"),
            price: self.price()?,
        };
        Ok((input, self.images))
    }
}

#[utoipa::path(post, path = "/hotel", tag = "hotel", request_body(content = crate::openapi::HotelFormDoc, content_type = "multipart/form-data"), responses((status = 201, description = "Created", body = crate::openapi::HotelDoc), (status = 400, description = "Invalid form or no image"), (status = 403, description = "Admin only"), (status = 409, description = "Name taken"), (status = 502, description = "Image host failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(mp, _): WithRejection<Multipart, JsonApiError>,
) -> Result<(StatusCode, Json<hotel::Model>), JsonApiError> {
    let (input, images) = HotelForm::read(mp).await?.into_create()?;
    let created = state.hotels.create(&actor, input, images).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/hotel", tag = "hotel", params(("limit" = Option<u64>, Query, description = "1..=100, default 10"), ("sortBy" = Option<String>, Query, description = "name | location | price"), ("order" = Option<String>, Query, description = "ASC | DESC, default DESC")), responses((status = 200, description = "Hotels", body = [crate::openapi::HotelDoc])))]
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<ListHotelsQuery>, JsonApiError>,
) -> Result<Json<Vec<hotel::Model>>, JsonApiError> {
    let hotels = state.hotels.list(query).await?;
    info!(count = hotels.len(), "list hotels");
    Ok(Json(hotels))
}

#[utoipa::path(get, path = "/hotel/search/{query}", tag = "hotel", params(("query" = String, Path, description = "Name substring")), responses((status = 200, description = "At most 10 matches", body = [crate::openapi::HotelDoc])))]
pub async fn search(State(state): State<ServerState>, Path(query): Path<String>) -> Result<Json<Vec<hotel::Model>>, JsonApiError> {
    Ok(Json(state.hotels.search(&query).await?))
}

#[utoipa::path(get, path = "/hotel/{id}", tag = "hotel", params(("id" = Uuid, Path, description = "Hotel id")), responses((status = 200, description = "Hotel", body = crate::openapi::HotelDoc), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>) -> Result<Json<hotel::Model>, JsonApiError> {
    Ok(Json(state.hotels.get(id).await?))
}

#[utoipa::path(patch, path = "/hotel/{id}", tag = "hotel", params(("id" = Uuid, Path, description = "Hotel id")), request_body(content = crate::openapi::HotelFormDoc, content_type = "multipart/form-data"), responses((status = 200, description = "Updated; new images appended", body = crate::openapi::HotelDoc), (status = 403, description = "Admin only"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
    WithRejection(mp, _): WithRejection<Multipart, JsonApiError>,
) -> Result<Json<hotel::Model>, JsonApiError> {
    let (input, images) = HotelForm::read(mp).await?.into_update()?;
    Ok(Json(state.hotels.update(&actor, id, input, images).await?))
}

#[utoipa::path(delete, path = "/hotel/{id}", tag = "hotel", params(("id" = Uuid, Path, description = "Hotel id")), responses((status = 204, description = "Deleted; bookings keep a null hotel"), (status = 403, description = "Admin only"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, JsonApiError>,
) -> Result<StatusCode, JsonApiError> {
    state.hotels.remove(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
