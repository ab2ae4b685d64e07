use sea_orm::{entity::prelude::*, FromJsonQueryResult, QueryOrder, QuerySelect, Set, DatabaseConnection};
use sea_orm::sea_query::{Expr, Func};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::pattern::contains_pattern;
use crate::booking;

/// Hosted image URLs, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct PictureList(pub Vec<String>);

impl PictureList {
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<String>> for PictureList {
    fn from(v: Vec<String>) -> Self { Self(v) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub street: Option<String>,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Json")]
    pub picture_list: PictureList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Booking => Entity::has_many(booking::Entity).into() }
    }
}

impl Related<booking::Entity> for Entity {
    fn to() -> RelationDef { Relation::Booking.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotelSort {
    #[default]
    Name,
    Location,
    Price,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u64,
    pub sort_by: HotelSort,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { limit: 10, sort_by: HotelSort::Name, order: SortOrder::Desc }
    }
}

pub const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Clone)]
pub struct NewHotel {
    pub name: String,
    pub street: Option<String>,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub picture_list: Vec<String>,
}

/// Partial update. `append_pictures` is added to the stored list, never replaces it.
#[derive(Debug, Clone, Default)]
pub struct HotelChanges {
    pub name: Option<String>,
    pub street: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub append_pictures: Vec<String>,
}

impl HotelChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.street.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.append_pictures.is_empty()
    }
}

fn min_chars(field: &str, value: &str, min: usize) -> Result<(), ModelError> {
    if value.trim().chars().count() < min {
        return Err(ModelError::Validation(format!("{} must be at least {} characters", field, min)));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> { min_chars("name", name, 3) }

pub fn validate_location(location: &str) -> Result<(), ModelError> { min_chars("location", location, 3) }

pub fn validate_description(description: &str) -> Result<(), ModelError> { min_chars("description", description, 10) }

pub fn validate_street(street: &str) -> Result<(), ModelError> { min_chars("street", street, 1) }

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ModelError::Validation("price must be a positive number".into()));
    }
    Ok(())
}

pub fn validate_new(input: &NewHotel) -> Result<(), ModelError> {
    validate_name(&input.name)?;
    if let Some(s) = &input.street { validate_street(s)?; }
    validate_location(&input.location)?;
    validate_description(&input.description)?;
    validate_price(input.price)
}

pub fn validate_changes(changes: &HotelChanges) -> Result<(), ModelError> {
    if let Some(v) = &changes.name { validate_name(v)?; }
    if let Some(v) = &changes.street { validate_street(v)?; }
    if let Some(v) = &changes.location { validate_location(v)?; }
    if let Some(v) = &changes.description { validate_description(v)?; }
    if let Some(v) = changes.price { validate_price(v)?; }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewHotel) -> Result<Model, ModelError> {
    validate_new(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        street: Set(input.street.map(|s| s.trim().to_string())),
        location: Set(input.location.trim().to_string()),
        description: Set(input.description.trim().to_string()),
        price: Set(input.price),
        picture_list: Set(PictureList(input.picture_list)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name.trim())).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, opts: ListOptions) -> Result<Vec<Model>, ModelError> {
    let column = match opts.sort_by {
        HotelSort::Name => Column::Name,
        HotelSort::Location => Column::Location,
        HotelSort::Price => Column::Price,
    };
    let query = match opts.order {
        SortOrder::Asc => Entity::find().order_by_asc(column),
        SortOrder::Desc => Entity::find().order_by_desc(column),
    };
    Ok(query.limit(opts.limit).all(db).await?)
}

/// Case-insensitive name match, capped at [`SEARCH_LIMIT`] rows.
pub async fn search(db: &DatabaseConnection, query: &str) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).like(contains_pattern(query)))
        .order_by_asc(Column::Name)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: HotelChanges) -> Result<Model, ModelError> {
    validate_changes(&changes)?;
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("hotel"))?;
    if changes.is_empty() {
        return Ok(existing);
    }
    let mut pictures = existing.picture_list.clone();
    let mut am: ActiveModel = existing.into();
    if let Some(v) = changes.name { am.name = Set(v.trim().to_string()); }
    if let Some(v) = changes.street { am.street = Set(Some(v.trim().to_string())); }
    if let Some(v) = changes.location { am.location = Set(v.trim().to_string()); }
    if let Some(v) = changes.description { am.description = Set(v.trim().to_string()); }
    if let Some(v) = changes.price { am.price = Set(v); }
    if !changes.append_pictures.is_empty() {
        pictures.0.extend(changes.append_pictures);
        am.picture_list = Set(pictures);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
