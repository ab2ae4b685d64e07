use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::user::{self, NewUser, UserChanges};
use crate::errors::ServiceError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: NewUser) -> Result<user::Model, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError>;
    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<user::Model>, ServiceError>;
    async fn search(&self, query: &str) -> Result<Vec<user::Model>, ServiceError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<user::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, input: NewUser) -> Result<user::Model, ServiceError> {
        Ok(user::create(&self.db, input).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_id(&self.db, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_email(&self.db, email).await?)
    }

    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<user::Model>, ServiceError> {
        Ok(user::list(&self.db, page_idx, per_page).await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<user::Model>, ServiceError> {
        Ok(user::search(&self.db, query).await?)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<user::Model, ServiceError> {
        Ok(user::update(&self.db, id, changes).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(user::delete(&self.db, id).await?)
    }
}
