//! User accounts: repository seam plus the service enforcing role rules.

pub mod repository;
pub mod service;

pub use repository::{SeaOrmUserRepository, UserRepository};
pub use service::{CreateUserInput, UpdateUserInput, UserService};
