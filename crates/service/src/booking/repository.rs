use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::booking::{self, BookingChanges, NewBooking};
use crate::errors::ServiceError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, input: NewBooking) -> Result<booking::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<booking::Model>, ServiceError>;
    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError>;
    async fn list_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError>;
    async fn update(&self, id: Uuid, changes: BookingChanges) -> Result<booking::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBookingRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create(&self, input: NewBooking) -> Result<booking::Model, ServiceError> {
        Ok(booking::create(&self.db, input).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<booking::Model>, ServiceError> {
        Ok(booking::find_by_id(&self.db, id).await?)
    }

    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError> {
        Ok(booking::list(&self.db, page_idx, per_page).await?)
    }

    async fn list_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError> {
        Ok(booking::list_by_user(&self.db, user_id, page_idx, per_page).await?)
    }

    async fn update(&self, id: Uuid, changes: BookingChanges) -> Result<booking::Model, ServiceError> {
        Ok(booking::update(&self.db, id, changes).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(booking::delete(&self.db, id).await?)
    }
}
