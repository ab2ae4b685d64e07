//! Pieces shared by the binary and the server crate: log setup and small wire types.

pub mod types;
pub mod utils;
