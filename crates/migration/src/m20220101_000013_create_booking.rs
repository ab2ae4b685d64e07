//! Create `booking` table with nullable FKs to `user` and `hotel`.
//!
//! Deleting a user or hotel clears the reference (SET NULL); bookings are never cascaded.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(timestamp_with_time_zone(Booking::CheckIn).not_null())
                    .col(timestamp_with_time_zone(Booking::CheckOut).not_null())
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(ColumnDef::new(Booking::UserId).uuid().null())
                    .col(ColumnDef::new(Booking::HotelId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_hotel")
                            .from(Booking::Table, Booking::HotelId)
                            .to(Hotel::Table, Hotel::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, Id, CheckIn, CheckOut, CreatedAt, UserId, HotelId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Hotel { Table, Id }
