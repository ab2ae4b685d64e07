use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::hotel::{self, HotelChanges, ListOptions, NewHotel};
use crate::errors::ServiceError;

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(&self, input: NewHotel) -> Result<hotel::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<hotel::Model>, ServiceError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<hotel::Model>, ServiceError>;
    async fn list(&self, opts: ListOptions) -> Result<Vec<hotel::Model>, ServiceError>;
    async fn search(&self, query: &str) -> Result<Vec<hotel::Model>, ServiceError>;
    async fn update(&self, id: Uuid, changes: HotelChanges) -> Result<hotel::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmHotelRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl HotelRepository for SeaOrmHotelRepository {
    async fn create(&self, input: NewHotel) -> Result<hotel::Model, ServiceError> {
        Ok(hotel::create(&self.db, input).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<hotel::Model>, ServiceError> {
        Ok(hotel::find_by_id(&self.db, id).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<hotel::Model>, ServiceError> {
        Ok(hotel::find_by_name(&self.db, name).await?)
    }

    async fn list(&self, opts: ListOptions) -> Result<Vec<hotel::Model>, ServiceError> {
        Ok(hotel::list(&self.db, opts).await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<hotel::Model>, ServiceError> {
        Ok(hotel::search(&self.db, query).await?)
    }

    async fn update(&self, id: Uuid, changes: HotelChanges) -> Result<hotel::Model, ServiceError> {
        Ok(hotel::update(&self.db, id, changes).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(hotel::delete(&self.db, id).await?)
    }
}
