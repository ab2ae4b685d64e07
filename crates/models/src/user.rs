use sea_orm::{entity::prelude::*, Condition, QueryOrder, Set, DatabaseConnection};
use sea_orm::sea_query::{Expr, Func, StringLen};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::pattern::contains_pattern;
use crate::booking;

/// Account role carried in tokens and checked by the service layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub pseudo: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
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

/// Fields for a new account. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub pseudo: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub pseudo: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let len = email.chars().count();
    if !email.contains('@') || !(2..=50).contains(&len) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_firstname(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("firstname required".into()));
    }
    Ok(())
}

fn validate_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ModelError::Validation(format!("{} must be {}..={} characters", field, min, max)));
    }
    Ok(())
}

pub fn validate_lastname(name: &str) -> Result<(), ModelError> { validate_len("lastname", name, 2, 50) }

pub fn validate_pseudo(pseudo: &str) -> Result<(), ModelError> { validate_len("pseudo", pseudo, 2, 50) }

/// Plain-text password policy, checked before hashing.
pub fn validate_password(password: &str) -> Result<(), ModelError> {
    let len = password.chars().count();
    if !(8..=30).contains(&len) {
        return Err(ModelError::Validation("password must be 8..=30 characters".into()));
    }
    Ok(())
}

pub fn validate_new(input: &NewUser) -> Result<(), ModelError> {
    validate_firstname(&input.firstname)?;
    validate_lastname(&input.lastname)?;
    validate_email(&input.email)?;
    validate_pseudo(&input.pseudo)?;
    if input.password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    Ok(())
}

pub fn validate_changes(changes: &UserChanges) -> Result<(), ModelError> {
    if let Some(v) = &changes.firstname { validate_firstname(v)?; }
    if let Some(v) = &changes.lastname { validate_lastname(v)?; }
    if let Some(v) = &changes.email { validate_email(v)?; }
    if let Some(v) = &changes.pseudo { validate_pseudo(v)?; }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<Model, ModelError> {
    validate_new(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        firstname: Set(input.firstname.trim().to_string()),
        lastname: Set(input.lastname.trim().to_string()),
        email: Set(normalize_email(&input.email)),
        pseudo: Set(input.pseudo.trim().to_string()),
        password_hash: Set(input.password_hash),
        role: Set(input.role),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

/// Page through users ordered by creation time. `page_idx` is 0-based.
pub async fn list(db: &DatabaseConnection, page_idx: u64, per_page: u64) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_asc(Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

/// Case-insensitive substring match on email, first name or last name.
pub async fn search(db: &DatabaseConnection, query: &str) -> Result<Vec<Model>, ModelError> {
    let pattern = contains_pattern(query);
    let lower_like = |col: Column| Expr::expr(Func::lower(Expr::col(col))).like(pattern.clone());
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(lower_like(Column::Email))
                .add(lower_like(Column::Lastname))
                .add(lower_like(Column::Firstname)),
        )
        .order_by_asc(Column::Email)
        .all(db)
        .await?)
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: UserChanges) -> Result<Model, ModelError> {
    validate_changes(&changes)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("user"))?
        .into();
    if let Some(v) = changes.firstname { am.firstname = Set(v.trim().to_string()); }
    if let Some(v) = changes.lastname { am.lastname = Set(v.trim().to_string()); }
    if let Some(v) = changes.email { am.email = Set(normalize_email(&v)); }
    if let Some(v) = changes.pseudo { am.pseudo = Set(v.trim().to_string()); }
    if let Some(v) = changes.password_hash { am.password_hash = Set(v); }
    if let Some(v) = changes.role { am.role = Set(v); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Hard delete; returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
