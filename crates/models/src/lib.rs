pub mod errors;
mod pattern;
pub mod db;
pub mod user;
pub mod hotel;
pub mod booking;

#[cfg(test)]
mod tests;
