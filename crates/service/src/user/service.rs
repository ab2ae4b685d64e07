use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::user::{self, NewUser, Role, UserChanges};
use crate::access::Actor;
use crate::auth::password;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use super::repository::UserRepository;

/// Account creation payload. `role` is honoured only on the admin path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub pseudo: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub pseudo: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self { Self { repo } }

    pub fn repository(&self) -> Arc<dyn UserRepository> { self.repo.clone() }

    /// Hash the password and store the account with `role`. No actor check.
    pub(crate) async fn insert(&self, input: CreateUserInput, role: Role) -> Result<user::Model, ServiceError> {
        user::validate_password(&input.password)?;
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Conflict("email already registered".into()));
        }
        let password_hash = password::hash(&input.password)?;
        let created = self
            .repo
            .create(NewUser {
                firstname: input.firstname,
                lastname: input.lastname,
                email: input.email,
                pseudo: input.pseudo,
                password_hash,
                role,
            })
            .await?;
        info!(user_id = %created.id, role = %created.role, "user_created");
        Ok(created)
    }

    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id, email = %input.email))]
    pub async fn create(&self, actor: &Actor, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        actor.require_admin()?;
        let role = input.role.unwrap_or_default();
        self.insert(input, role).await
    }

    pub async fn list(&self, actor: &Actor, page: Pagination) -> Result<Vec<user::Model>, ServiceError> {
        actor.require_admin()?;
        let (page_idx, per_page) = page.normalize();
        self.repo.list(page_idx, per_page).await
    }

    pub async fn search(&self, actor: &Actor, query: &str) -> Result<Vec<user::Model>, ServiceError> {
        actor.require_admin()?;
        if query.trim().is_empty() {
            return Err(ServiceError::Validation("search query required".into()));
        }
        self.repo.search(query).await
    }

    /// Readable by the account itself, employees and admins.
    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<user::Model, ServiceError> {
        if actor.id != id {
            actor.require_any(&[Role::Employee, Role::Admin])?;
        }
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn current(&self, actor: &Actor) -> Result<user::Model, ServiceError> {
        self.repo.find_by_id(actor.id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id, user_id = %id))]
    pub async fn update(&self, actor: &Actor, id: Uuid, input: UpdateUserInput) -> Result<user::Model, ServiceError> {
        actor.ensure_owner_or_admin(Some(id))?;
        if input.role.is_some() && !actor.is_admin() {
            return Err(ServiceError::forbidden("only admins can change roles"));
        }
        let current = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user"))?;

        if let Some(email) = &input.email {
            let normalized = user::normalize_email(email);
            if normalized != current.email {
                if let Some(other) = self.repo.find_by_email(&normalized).await? {
                    if other.id != id {
                        return Err(ServiceError::Conflict("email already registered".into()));
                    }
                }
            }
        }

        let password_hash = match &input.password {
            Some(p) => {
                user::validate_password(p)?;
                Some(password::hash(p)?)
            }
            None => None,
        };

        let changes = UserChanges {
            firstname: input.firstname,
            lastname: input.lastname,
            email: input.email,
            pseudo: input.pseudo,
            password_hash,
            role: input.role,
        };
        let updated = self.repo.update(id, changes).await?;
        info!(user_id = %updated.id, "user_updated");
        Ok(updated)
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id, user_id = %id))]
    pub async fn remove(&self, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
        actor.ensure_owner_or_admin(Some(id))?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("user"));
        }
        info!(user_id = %id, "user_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStore;

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            firstname: "Grace".into(),
            lastname: "Hopper".into(),
            email: email.into(),
            pseudo: "grace".into(),
            password: "Compiler1952".into(),
            role: None,
        }
    }

    fn svc() -> UserService {
        UserService::new(Arc::new(MockStore::default()))
    }

    async fn admin(svc: &UserService) -> Actor {
        let mut i = input("root@example.com");
        i.role = Some(Role::Admin);
        let m = svc.insert(i, Role::Admin).await.unwrap();
        Actor::new(m.id, m.email, m.role)
    }

    fn as_actor(m: &user::Model) -> Actor { Actor::new(m.id, m.email.clone(), m.role) }

    #[tokio::test]
    async fn create_requires_admin_and_rejects_duplicate_email() {
        let svc = svc();
        let admin = admin(&svc).await;
        let mut i = input("staff@example.com");
        i.role = Some(Role::Employee);
        let staff = svc.create(&admin, i).await.unwrap();
        assert_eq!(staff.role, Role::Employee);
        assert_ne!(staff.password_hash, "Compiler1952");

        let err = svc.create(&admin, input("STAFF@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = svc.create(&as_actor(&staff), input("other@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn get_allows_self_employee_and_admin() {
        let svc = svc();
        let admin = admin(&svc).await;
        let alice = svc.insert(input("alice@example.com"), Role::User).await.unwrap();
        let bob = svc.insert(input("bob@example.com"), Role::User).await.unwrap();
        let clerk = svc.insert(input("clerk@example.com"), Role::Employee).await.unwrap();

        assert_eq!(svc.get(&as_actor(&alice), alice.id).await.unwrap().id, alice.id);
        assert!(matches!(svc.get(&as_actor(&bob), alice.id).await, Err(ServiceError::Forbidden(_))));
        assert!(svc.get(&as_actor(&clerk), alice.id).await.is_ok());
        assert!(svc.get(&admin, alice.id).await.is_ok());
        assert!(matches!(svc.get(&admin, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn role_change_requires_admin() {
        let svc = svc();
        let admin = admin(&svc).await;
        let alice = svc.insert(input("alice@example.com"), Role::User).await.unwrap();
        let me = as_actor(&alice);

        let promote = UpdateUserInput { role: Some(Role::Admin), ..Default::default() };
        let err = svc.update(&me, alice.id, promote.clone()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(svc.current(&me).await.unwrap().role, Role::User);

        let updated = svc.update(&admin, alice.id, promote).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn update_checks_owner_email_and_rehashes_password() {
        let svc = svc();
        let alice = svc.insert(input("alice@example.com"), Role::User).await.unwrap();
        let bob = svc.insert(input("bob@example.com"), Role::User).await.unwrap();

        let err = svc
            .update(&as_actor(&bob), alice.id, UpdateUserInput { pseudo: Some("hijack".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = svc
            .update(&as_actor(&alice), alice.id, UpdateUserInput { email: Some("bob@example.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let updated = svc
            .update(&as_actor(&alice), alice.id, UpdateUserInput { password: Some("NewSecret99".into()), ..Default::default() })
            .await
            .unwrap();
        assert_ne!(updated.password_hash, alice.password_hash);
        assert!(password::verify("NewSecret99", &updated.password_hash).unwrap());

        let err = svc
            .update(&as_actor(&alice), alice.id, UpdateUserInput { password: Some("short".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn list_search_and_remove() {
        let svc = svc();
        let admin = admin(&svc).await;
        let alice = svc.insert(input("alice@example.com"), Role::User).await.unwrap();
        svc.insert(input("bob@example.com"), Role::User).await.unwrap();

        assert_eq!(svc.list(&admin, Pagination { page: 1, per_page: 2 }).await.unwrap().len(), 2);
        assert_eq!(svc.list(&admin, Pagination { page: 2, per_page: 2 }).await.unwrap().len(), 1);
        assert!(svc.list(&as_actor(&alice), Pagination::default()).await.is_err());

        let found = svc.search(&admin, "ALICE").await.unwrap();
        assert_eq!(found.len(), 1);

        svc.remove(&as_actor(&alice), alice.id).await.unwrap();
        assert!(matches!(svc.remove(&admin, alice.id).await, Err(ServiceError::NotFound(_))));
    }
}
