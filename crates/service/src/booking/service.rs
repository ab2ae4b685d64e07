use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::booking::{self, BookingChanges, NewBooking};
use crate::access::Actor;
use crate::errors::ServiceError;
use crate::hotel::HotelRepository;
use crate::pagination::Pagination;
use crate::user::UserRepository;
use super::repository::BookingRepository;

/// `user_id` defaults to the caller. camelCase names are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingInput {
    #[serde(alias = "hotelId")]
    pub hotel_id: Uuid,
    #[serde(alias = "checkInDate")]
    pub check_in: DateTime<FixedOffset>,
    #[serde(alias = "checkOutDate")]
    pub check_out: DateTime<FixedOffset>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookingInput {
    #[serde(default, alias = "hotelId")]
    pub hotel_id: Option<Uuid>,
    #[serde(default, alias = "checkInDate")]
    pub check_in: Option<DateTime<FixedOffset>>,
    #[serde(default, alias = "checkOutDate")]
    pub check_out: Option<DateTime<FixedOffset>>,
}

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
    hotels: Arc<dyn HotelRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        hotels: Arc<dyn HotelRepository>,
    ) -> Self {
        Self { bookings, users, hotels }
    }

    async fn ensure_hotel(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.hotels.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("hotel")),
        }
    }

    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id, hotel_id = %input.hotel_id))]
    pub async fn create(&self, actor: &Actor, input: CreateBookingInput) -> Result<booking::Model, ServiceError> {
        let user_id = input.user_id.unwrap_or(actor.id);
        if user_id != actor.id && !actor.is_admin() {
            return Err(ServiceError::forbidden("only admins can book for another user"));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::not_found("user"));
        }
        self.ensure_hotel(input.hotel_id).await?;

        let created = self
            .bookings
            .create(NewBooking {
                user_id,
                hotel_id: input.hotel_id,
                check_in: input.check_in,
                check_out: input.check_out,
            })
            .await?;
        info!(booking_id = %created.id, user_id = %user_id, "booking_created");
        Ok(created)
    }

    /// Admins see every booking, everyone else only their own.
    pub async fn list(&self, actor: &Actor, page: Pagination) -> Result<Vec<booking::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        if actor.is_admin() {
            self.bookings.list(page_idx, per_page).await
        } else {
            self.bookings.list_by_user(actor.id, page_idx, per_page).await
        }
    }

    pub async fn list_for_user(&self, actor: &Actor, user_id: Uuid, page: Pagination) -> Result<Vec<booking::Model>, ServiceError> {
        actor.ensure_owner_or_admin(Some(user_id))?;
        let (page_idx, per_page) = page.normalize();
        self.bookings.list_by_user(user_id, page_idx, per_page).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<booking::Model, ServiceError> {
        let found = self.bookings.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("booking"))?;
        actor.ensure_owner_or_admin(found.user_id)?;
        Ok(found)
    }

    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id, booking_id = %id))]
    pub async fn update(&self, actor: &Actor, id: Uuid, input: UpdateBookingInput) -> Result<booking::Model, ServiceError> {
        self.get(actor, id).await?;
        if let Some(hotel_id) = input.hotel_id {
            self.ensure_hotel(hotel_id).await?;
        }
        let updated = self
            .bookings
            .update(
                id,
                BookingChanges { hotel_id: input.hotel_id, check_in: input.check_in, check_out: input.check_out },
            )
            .await?;
        info!(booking_id = %updated.id, "booking_updated");
        Ok(updated)
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id, booking_id = %id))]
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        self.get(actor, id).await?;
        if !self.bookings.delete(id).await? {
            return Err(ServiceError::not_found("booking"));
        }
        info!(booking_id = %id, "booking_deleted");
        Ok(())
    }
}
