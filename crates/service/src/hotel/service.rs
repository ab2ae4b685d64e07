use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::hotel::{self, HotelChanges, HotelSort, ListOptions, NewHotel, SortOrder};
use crate::access::Actor;
use crate::errors::ServiceError;
use crate::image_host::{ImageFile, ImageHost};
use super::repository::HotelRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHotelInput {
    pub name: String,
    #[serde(default)]
    pub street: Option<String>,
    pub location: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHotelInput {
    pub name: Option<String>,
    pub street: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl UpdateHotelInput {
    fn into_changes(self, append_pictures: Vec<String>) -> HotelChanges {
        HotelChanges {
            name: self.name,
            street: self.street,
            location: self.location,
            description: self.description,
            price: self.price,
            append_pictures,
        }
    }
}

/// Query string of `GET /hotel`; `sortBy` is accepted as an alias.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListHotelsQuery {
    pub limit: Option<u64>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<HotelSort>,
    pub order: Option<SortOrder>,
}

impl ListHotelsQuery {
    pub const MAX_LIMIT: u64 = 100;

    pub fn into_options(self) -> ListOptions {
        let defaults = ListOptions::default();
        ListOptions {
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, Self::MAX_LIMIT),
            sort_by: self.sort_by.unwrap_or(defaults.sort_by),
            order: self.order.unwrap_or(defaults.order),
        }
    }
}

#[derive(Clone)]
pub struct HotelService {
    repo: Arc<dyn HotelRepository>,
    images: Arc<dyn ImageHost>,
}

impl HotelService {
    pub fn new(repo: Arc<dyn HotelRepository>, images: Arc<dyn ImageHost>) -> Self { Self { repo, images } }

    pub fn repository(&self) -> Arc<dyn HotelRepository> { self.repo.clone() }

    /// Fields and name uniqueness are checked before anything is uploaded.
    #[instrument(skip(self, actor, input, images), fields(actor_id = %actor.id, name = %input.name, images = images.len()))]
    pub async fn create(&self, actor: &Actor, input: CreateHotelInput, images: Vec<ImageFile>) -> Result<hotel::Model, ServiceError> {
        actor.require_admin()?;
        if images.is_empty() {
            return Err(ServiceError::Validation("at least one image is required".into()));
        }
        let mut new = NewHotel {
            name: input.name,
            street: input.street,
            location: input.location,
            description: input.description,
            price: input.price,
            picture_list: Vec::new(),
        };
        hotel::validate_new(&new)?;
        if self.repo.find_by_name(&new.name).await?.is_some() {
            return Err(ServiceError::Conflict("a hotel with this name already exists".into()));
        }

        new.picture_list = self.images.upload(images).await?;
        let created = self.repo.create(new).await?;
        info!(hotel_id = %created.id, pictures = created.picture_list.len(), "hotel_created");
        Ok(created)
    }

    pub async fn list(&self, query: ListHotelsQuery) -> Result<Vec<hotel::Model>, ServiceError> {
        self.repo.list(query.into_options()).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<hotel::Model>, ServiceError> {
        if query.trim().is_empty() {
            return Err(ServiceError::Validation("search query required".into()));
        }
        self.repo.search(query).await
    }

    pub async fn get(&self, id: Uuid) -> Result<hotel::Model, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("hotel"))
    }

    /// New images are appended to the stored picture list.
    #[instrument(skip(self, actor, input, images), fields(actor_id = %actor.id, hotel_id = %id, images = images.len()))]
    pub async fn update(&self, actor: &Actor, id: Uuid, input: UpdateHotelInput, images: Vec<ImageFile>) -> Result<hotel::Model, ServiceError> {
        actor.require_admin()?;
        let current = self.get(id).await?;
        let changes = input.into_changes(Vec::new());
        hotel::validate_changes(&changes)?;
        if let Some(name) = &changes.name {
            if name.trim() != current.name {
                if let Some(other) = self.repo.find_by_name(name).await? {
                    if other.id != id {
                        return Err(ServiceError::Conflict("a hotel with this name already exists".into()));
                    }
                }
            }
        }

        let mut changes = changes;
        if !images.is_empty() {
            changes.append_pictures = self.images.upload(images).await?;
        }
        let updated = self.repo.update(id, changes).await?;
        info!(hotel_id = %updated.id, "hotel_updated");
        Ok(updated)
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id, hotel_id = %id))]
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("hotel"));
        }
        info!(hotel_id = %id, "hotel_deleted");
        Ok(())
    }
}
