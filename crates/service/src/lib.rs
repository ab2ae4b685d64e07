//! Service layer: business rules for users, hotels and bookings on top of `models`.
//! - Repositories are traits so services run against SeaORM or the in-memory mock.
//! - Every mutating operation takes the calling [`access::Actor`] and enforces
//!   role and ownership rules before touching storage.

pub mod errors;
pub mod access;
pub mod pagination;
pub mod auth;
pub mod user;
pub mod hotel;
pub mod booking;
pub mod image_host;
pub mod mock;
#[cfg(test)]
pub mod test_support;

pub use access::Actor;
pub use errors::ServiceError;
