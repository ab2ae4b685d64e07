/// Connection and migration tests
pub mod db_tests;


use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::db::{connect_and_migrate, in_memory_config};

/// Fresh in-memory database with the full schema applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    connect_and_migrate(&in_memory_config()).await
}
