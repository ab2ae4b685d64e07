use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Booking: lookups by owner and by hotel
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_hotel")
                    .table(Booking::Table)
                    .col(Booking::HotelId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Hotel: default listing sorts by name, filters by price
        manager
            .create_index(
                Index::create()
                    .name("idx_hotel_price")
                    .table(Hotel::Table)
                    .col(Hotel::Price)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_hotel_price").table(Hotel::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_hotel").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_user").table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, UserId, HotelId }

#[derive(DeriveIden)]
enum Hotel { Table, Price }
