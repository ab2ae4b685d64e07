#![cfg(test)]
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use models::db::{connect_and_migrate, in_memory_config};

use crate::booking::{BookingService, SeaOrmBookingRepository};
use crate::hotel::{HotelService, SeaOrmHotelRepository};
use crate::image_host::StubImageHost;
use crate::user::{SeaOrmUserRepository, UserService};

/// Fresh migrated SQLite database for the current test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    connect_and_migrate(&in_memory_config()).await
}

pub struct SeaOrmServices {
    pub users: UserService,
    pub hotels: HotelService,
    pub bookings: BookingService,
}

pub async fn seaorm_services() -> Result<SeaOrmServices, anyhow::Error> {
    let db = get_db().await?;
    let users = Arc::new(SeaOrmUserRepository { db: db.clone() });
    let hotels = Arc::new(SeaOrmHotelRepository { db: db.clone() });
    let bookings = Arc::new(SeaOrmBookingRepository { db });
    Ok(SeaOrmServices {
        users: UserService::new(users.clone()),
        hotels: HotelService::new(hotels.clone(), Arc::new(StubImageHost::default())),
        bookings: BookingService::new(bookings, users, hotels),
    })
}

mod seaorm_flow {
    use super::*;
    use chrono::DateTime;
    use models::user::Role;
    use crate::access::Actor;
    use crate::booking::CreateBookingInput;
    use crate::errors::ServiceError;
    use crate::hotel::CreateHotelInput;
    use crate::image_host::ImageFile;
    use crate::pagination::Pagination;
    use crate::user::CreateUserInput;

    fn account(email: &str) -> CreateUserInput {
        CreateUserInput {
            firstname: "Margaret".into(),
            lastname: "Hamilton".into(),
            email: email.into(),
            pseudo: "maggie".into(),
            password: "Apollo1969".into(),
            role: None,
        }
    }

    #[tokio::test]
    async fn hotel_removal_keeps_bookings_through_seaorm() -> anyhow::Result<()> {
        let s = seaorm_services().await?;
        let admin_row = s.users.insert(account("admin@example.com"), Role::Admin).await?;
        let admin = Actor::new(admin_row.id, admin_row.email, admin_row.role);
        let guest_row = s.users.insert(account("guest@example.com"), Role::User).await?;
        let guest = Actor::new(guest_row.id, guest_row.email, guest_row.role);

        let hotel = s
            .hotels
            .create(
                &admin,
                CreateHotelInput {
                    name: "Moonbase Inn".into(),
                    street: Some("Tranquility Base".into()),
                    location: "The Moon".into(),
                    description: "Low gravity and no neighbours".into(),
                    price: 999.0,
                },
                vec![ImageFile { file_name: "moon.png".into(), content_type: None, bytes: vec![1] }],
            )
            .await?;

        let stamp = DateTime::parse_from_rfc3339("2033-03-03T12:00:00+00:00")?;
        let booking = s
            .bookings
            .create(&guest, CreateBookingInput { hotel_id: hotel.id, check_in: stamp, check_out: stamp, user_id: None })
            .await?;

        s.hotels.remove(&admin, hotel.id).await?;
        let kept = s.bookings.get(&guest, booking.id).await?;
        assert_eq!(kept.hotel_id, None);
        assert_eq!(s.bookings.list(&guest, Pagination::default()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_through_seaorm() -> anyhow::Result<()> {
        let s = seaorm_services().await?;
        s.users.insert(account("same@example.com"), Role::User).await?;
        let err = s.users.insert(account("same@example.com"), Role::User).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }
}
