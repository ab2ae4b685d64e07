//! Hotels: public catalogue reads, admin-only writes with image upload.

pub mod repository;
pub mod service;

pub use repository::{HotelRepository, SeaOrmHotelRepository};
pub use service::{CreateHotelInput, HotelService, ListHotelsQuery, UpdateHotelInput};
