use chrono::{DateTime, FixedOffset};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub firstname: String, pub lastname: String, pub email: String, pub pseudo: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// Public user view; the password hash is never serialized.
#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub pseudo: String,
    /// user | admin | employee
    pub role: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub token: String, pub user: UserDoc }

#[derive(ToSchema)]
pub struct CreateUserRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub pseudo: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateUserRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub pseudo: Option<String>,
    pub password: Option<String>,
    /// Admins only.
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct HotelDoc {
    pub id: Uuid,
    pub name: String,
    pub street: Option<String>,
    pub location: String,
    pub description: String,
    pub price: f64,
    pub picture_list: Vec<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// multipart/form-data body; `images` may repeat.
#[derive(ToSchema)]
pub struct HotelFormDoc {
    pub name: Option<String>,
    pub street: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub images: Vec<String>,
}

#[derive(ToSchema)]
pub struct BookingDoc {
    pub id: Uuid,
    pub check_in: DateTime<FixedOffset>,
    pub check_out: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
    pub user_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CreateBookingRequest {
    pub hotel_id: Uuid,
    pub check_in: DateTime<FixedOffset>,
    pub check_out: DateTime<FixedOffset>,
    /// Admins may book for someone else.
    pub user_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct UpdateBookingRequest {
    pub hotel_id: Option<Uuid>,
    pub check_in: Option<DateTime<FixedOffset>>,
    pub check_out: Option<DateTime<FixedOffset>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::search,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::hotels::create,
        crate::routes::hotels::list,
        crate::routes::hotels::search,
        crate::routes::hotels::get,
        crate::routes::hotels::update,
        crate::routes::hotels::delete,
        crate::routes::bookings::create,
        crate::routes::bookings::list,
        crate::routes::bookings::list_for_user,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UserDoc,
            LoginResponseDoc,
            CreateUserRequest,
            UpdateUserRequest,
            HotelDoc,
            HotelFormDoc,
            BookingDoc,
            CreateBookingRequest,
            UpdateBookingRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "user"),
        (name = "hotel"),
        (name = "booking")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_is_documented() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/auth/login", "/user/{id}", "/hotel", "/hotel/search/{query}", "/booking/user/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
