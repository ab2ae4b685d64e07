use sea_orm::{entity::prelude::*, QueryOrder, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{hotel, user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub check_in: DateTimeWithTimeZone,
    pub check_out: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub user_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Hotel,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<hotel::Entity> for Entity {
    fn to() -> RelationDef { Relation::Hotel.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub check_in: DateTimeWithTimeZone,
    pub check_out: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub hotel_id: Option<Uuid>,
    pub check_in: Option<DateTimeWithTimeZone>,
    pub check_out: Option<DateTimeWithTimeZone>,
}

/// Inserts a booking. Callers check that the user and hotel exist first.
pub async fn create(db: &DatabaseConnection, input: NewBooking) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        check_in: Set(input.check_in),
        check_out: Set(input.check_out),
        created_at: Set(Utc::now().into()),
        user_id: Set(Some(input.user_id)),
        hotel_id: Set(Some(input.hotel_id)),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, page_idx: u64, per_page: u64) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: BookingChanges) -> Result<Model, ModelError> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("booking"))?;
    if changes.hotel_id.is_none() && changes.check_in.is_none() && changes.check_out.is_none() {
        return Ok(existing);
    }
    let mut am: ActiveModel = existing.into();
    if let Some(v) = changes.hotel_id { am.hotel_id = Set(Some(v)); }
    if let Some(v) = changes.check_in { am.check_in = Set(v); }
    if let Some(v) = changes.check_out { am.check_out = Set(v); }
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
