//! In-memory store implementing every repository trait, for tests and doc examples.
//!
//! Mirrors the database rules that matter to the services: unique emails and
//! hotel names, field validation, and `SET NULL` on booking references when a
//! user or hotel is deleted.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use models::booking::{self, BookingChanges, NewBooking};
use models::hotel::{self, HotelChanges, HotelSort, ListOptions, NewHotel, PictureList, SortOrder};
use models::user::{self, NewUser, Role, UserChanges};
use crate::booking::BookingRepository;
use crate::errors::ServiceError;
use crate::hotel::HotelRepository;
use crate::user::UserRepository;

#[derive(Default)]
struct Tables {
    users: Vec<user::Model>,
    hotels: Vec<hotel::Model>,
    bookings: Vec<booking::Model>,
}

#[derive(Default)]
pub struct MockStore {
    tables: Mutex<Tables>,
}

fn page<T: Clone>(rows: &[T], page_idx: u64, per_page: u64) -> Vec<T> {
    rows.iter()
        .skip((page_idx * per_page) as usize)
        .take(per_page as usize)
        .cloned()
        .collect()
}

impl MockStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a ready-made account; the password hash is a placeholder.
    pub async fn seed_user(&self, email: &str, role: Role) -> user::Model {
        UserRepository::create(
            self,
            NewUser {
                firstname: "Seed".into(),
                lastname: "User".into(),
                email: email.into(),
                pseudo: "seed".into(),
                password_hash: "$argon2id$seed".into(),
                role,
            },
        )
        .await
        .unwrap_or_else(|e| panic!("seed user {}: {}", email, e))
    }

    pub async fn seed_hotel(&self, name: &str) -> hotel::Model {
        HotelRepository::create(
            self,
            NewHotel {
                name: name.into(),
                street: None,
                location: "Somewhere".into(),
                description: "Seeded hotel for tests".into(),
                price: 100.0,
                picture_list: vec![format!("https://images.invalid/{}.png", name)],
            },
        )
        .await
        .unwrap_or_else(|e| panic!("seed hotel {}: {}", name, e))
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn create(&self, input: NewUser) -> Result<user::Model, ServiceError> {
        user::validate_new(&input)?;
        let email = user::normalize_email(&input.email);
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == email) {
            return Err(ServiceError::Conflict("duplicate email".into()));
        }
        let now = Utc::now().into();
        let model = user::Model {
            id: Uuid::new_v4(),
            firstname: input.firstname.trim().to_string(),
            lastname: input.lastname.trim().to_string(),
            email,
            pseudo: input.pseudo.trim().to_string(),
            password_hash: input.password_hash,
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        t.users.push(model.clone());
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        let email = user::normalize_email(email);
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<user::Model>, ServiceError> {
        Ok(page(&self.lock().users, page_idx, per_page))
    }

    async fn search(&self, query: &str) -> Result<Vec<user::Model>, ServiceError> {
        let q = query.trim().to_lowercase();
        let mut found: Vec<_> = self
            .lock()
            .users
            .iter()
            .filter(|u| {
                u.email.contains(&q) || u.firstname.to_lowercase().contains(&q) || u.lastname.to_lowercase().contains(&q)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(found)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<user::Model, ServiceError> {
        user::validate_changes(&changes)?;
        let mut t = self.lock();
        if let Some(email) = &changes.email {
            let email = user::normalize_email(email);
            if t.users.iter().any(|u| u.email == email && u.id != id) {
                return Err(ServiceError::Conflict("duplicate email".into()));
            }
        }
        let u = t.users.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
        if let Some(v) = changes.firstname { u.firstname = v.trim().to_string(); }
        if let Some(v) = changes.lastname { u.lastname = v.trim().to_string(); }
        if let Some(v) = changes.email { u.email = user::normalize_email(&v); }
        if let Some(v) = changes.pseudo { u.pseudo = v.trim().to_string(); }
        if let Some(v) = changes.password_hash { u.password_hash = v; }
        if let Some(v) = changes.role { u.role = v; }
        u.updated_at = Utc::now().into();
        Ok(u.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.lock();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        for b in t.bookings.iter_mut().filter(|b| b.user_id == Some(id)) {
            b.user_id = None;
        }
        Ok(true)
    }
}

fn compare_hotels(a: &hotel::Model, b: &hotel::Model, sort_by: HotelSort) -> Ordering {
    match sort_by {
        HotelSort::Name => a.name.cmp(&b.name),
        HotelSort::Location => a.location.cmp(&b.location),
        HotelSort::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
    }
}

#[async_trait]
impl HotelRepository for MockStore {
    async fn create(&self, input: NewHotel) -> Result<hotel::Model, ServiceError> {
        hotel::validate_new(&input)?;
        let name = input.name.trim().to_string();
        let mut t = self.lock();
        if t.hotels.iter().any(|h| h.name == name) {
            return Err(ServiceError::Conflict("duplicate hotel name".into()));
        }
        let now = Utc::now().into();
        let model = hotel::Model {
            id: Uuid::new_v4(),
            name,
            street: input.street.map(|s| s.trim().to_string()),
            location: input.location.trim().to_string(),
            description: input.description.trim().to_string(),
            price: input.price,
            picture_list: PictureList(input.picture_list),
            created_at: now,
            updated_at: now,
        };
        t.hotels.push(model.clone());
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<hotel::Model>, ServiceError> {
        Ok(self.lock().hotels.iter().find(|h| h.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<hotel::Model>, ServiceError> {
        let name = name.trim();
        Ok(self.lock().hotels.iter().find(|h| h.name == name).cloned())
    }

    async fn list(&self, opts: ListOptions) -> Result<Vec<hotel::Model>, ServiceError> {
        let mut rows = self.lock().hotels.clone();
        rows.sort_by(|a, b| {
            let ord = compare_hotels(a, b, opts.sort_by);
            match opts.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        rows.truncate(opts.limit as usize);
        Ok(rows)
    }

    async fn search(&self, query: &str) -> Result<Vec<hotel::Model>, ServiceError> {
        let q = query.trim().to_lowercase();
        let mut found: Vec<_> = self
            .lock()
            .hotels
            .iter()
            .filter(|h| h.name.to_lowercase().contains(&q))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(hotel::SEARCH_LIMIT as usize);
        Ok(found)
    }

    async fn update(&self, id: Uuid, changes: HotelChanges) -> Result<hotel::Model, ServiceError> {
        hotel::validate_changes(&changes)?;
        let mut t = self.lock();
        if let Some(name) = &changes.name {
            let name = name.trim();
            if t.hotels.iter().any(|h| h.name == name && h.id != id) {
                return Err(ServiceError::Conflict("duplicate hotel name".into()));
            }
        }
        let h = t.hotels.iter_mut().find(|h| h.id == id).ok_or_else(|| ServiceError::not_found("hotel"))?;
        if let Some(v) = changes.name { h.name = v.trim().to_string(); }
        if let Some(v) = changes.street { h.street = Some(v.trim().to_string()); }
        if let Some(v) = changes.location { h.location = v.trim().to_string(); }
        if let Some(v) = changes.description { h.description = v.trim().to_string(); }
        if let Some(v) = changes.price { h.price = v; }
        h.picture_list.0.extend(changes.append_pictures);
        h.updated_at = Utc::now().into();
        Ok(h.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.lock();
        let before = t.hotels.len();
        t.hotels.retain(|h| h.id != id);
        if t.hotels.len() == before {
            return Ok(false);
        }
        for b in t.bookings.iter_mut().filter(|b| b.hotel_id == Some(id)) {
            b.hotel_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl BookingRepository for MockStore {
    async fn create(&self, input: NewBooking) -> Result<booking::Model, ServiceError> {
        let model = booking::Model {
            id: Uuid::new_v4(),
            check_in: input.check_in,
            check_out: input.check_out,
            created_at: Utc::now().into(),
            user_id: Some(input.user_id),
            hotel_id: Some(input.hotel_id),
        };
        // newest first, like the ordered SQL listing
        self.lock().bookings.insert(0, model.clone());
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<booking::Model>, ServiceError> {
        Ok(self.lock().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError> {
        Ok(page(&self.lock().bookings, page_idx, per_page))
    }

    async fn list_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<Vec<booking::Model>, ServiceError> {
        let owned: Vec<_> = self.lock().bookings.iter().filter(|b| b.user_id == Some(user_id)).cloned().collect();
        Ok(page(&owned, page_idx, per_page))
    }

    async fn update(&self, id: Uuid, changes: BookingChanges) -> Result<booking::Model, ServiceError> {
        let mut t = self.lock();
        let b = t.bookings.iter_mut().find(|b| b.id == id).ok_or_else(|| ServiceError::not_found("booking"))?;
        if let Some(v) = changes.hotel_id { b.hotel_id = Some(v); }
        if let Some(v) = changes.check_in { b.check_in = v; }
        if let Some(v) = changes.check_out { b.check_out = v; }
        Ok(b.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.lock();
        let before = t.bookings.len();
        t.bookings.retain(|b| b.id != id);
        Ok(t.bookings.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn deleting_referenced_rows_clears_booking_links() {
        let store = MockStore::default();
        let u = store.seed_user("guest@example.com", Role::User).await;
        let h = store.seed_hotel("Harbour View").await;
        let stamp = DateTime::parse_from_rfc3339("2032-02-02T10:00:00+01:00").unwrap();
        let b = BookingRepository::create(&store, NewBooking { user_id: u.id, hotel_id: h.id, check_in: stamp, check_out: stamp })
            .await
            .unwrap();

        assert!(HotelRepository::delete(&store, h.id).await.unwrap());
        let kept = BookingRepository::find_by_id(&store, b.id).await.unwrap().unwrap();
        assert_eq!(kept.hotel_id, None);
        assert_eq!(kept.user_id, Some(u.id));

        assert!(UserRepository::delete(&store, u.id).await.unwrap());
        let kept = BookingRepository::find_by_id(&store, b.id).await.unwrap().unwrap();
        assert_eq!(kept.user_id, None);
    }
}
