use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use super::setup_test_db;
use crate::db::{connect_with_config, in_memory_config};

#[tokio::test]
async fn test_in_memory_connection() -> Result<()> {
    let db = connect_with_config(&in_memory_config()).await?;
    assert_eq!(db.get_database_backend(), DatabaseBackend::Sqlite);

    let row = db
        .query_one(Statement::from_string(DatabaseBackend::Sqlite, "SELECT 1 AS test".to_string()))
        .await?
        .expect("one row");
    let value: i32 = row.try_get("", "test")?;
    assert_eq!(value, 1);
    Ok(())
}

#[tokio::test]
async fn test_migrations_apply_and_roll_back() -> Result<()> {
    let db = setup_test_db().await?;
    let applied = migration::Migrator::get_applied_migrations(&db).await?;
    assert_eq!(applied.len(), 4);

    migration::Migrator::down(&db, None).await?;
    assert!(migration::Migrator::get_applied_migrations(&db).await?.is_empty());

    migration::Migrator::up(&db, None).await?;
    assert!(migration::Migrator::get_pending_migrations(&db).await?.is_empty());
    Ok(())
}
