//! Bookings: a user's stay at a hotel, guarded by the owner-or-admin rule.

pub mod repository;
pub mod service;

pub use repository::{BookingRepository, SeaOrmBookingRepository};
pub use service::{BookingService, CreateBookingInput, UpdateBookingInput};
