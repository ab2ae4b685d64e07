//! Create `hotel` table.
//!
//! `picture_list` holds a JSON array of hosted image URLs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotel::Table)
                    .if_not_exists()
                    .col(uuid(Hotel::Id).primary_key())
                    .col(string_len(Hotel::Name, 128).unique_key().not_null())
                    .col(
                        ColumnDef::new(Hotel::Street)
                            .string_len(255)
                            .null(),
                    )
                    .col(string_len(Hotel::Location, 255).not_null())
                    .col(ColumnDef::new(Hotel::Description).text().not_null())
                    .col(ColumnDef::new(Hotel::Price).double().not_null())
                    .col(ColumnDef::new(Hotel::PictureList).json().not_null())
                    .col(timestamp_with_time_zone(Hotel::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Hotel::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Hotel::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Hotel { Table, Id, Name, Street, Location, Description, Price, PictureList, CreatedAt, UpdatedAt }
