//! Request actor and the role/ownership checks shared by every service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::Role;
use crate::errors::ServiceError;

/// Authenticated caller, decoded from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self { id, email: email.into(), role }
    }

    pub fn is_admin(&self) -> bool { self.role == Role::Admin }

    /// Admins may act on anything; everyone else only on what they own.
    pub fn can_act_on(&self, owner: Option<Uuid>) -> bool {
        self.is_admin() || owner == Some(self.id)
    }

    pub fn ensure_owner_or_admin(&self, owner: Option<Uuid>) -> Result<(), ServiceError> {
        if self.can_act_on(owner) {
            Ok(())
        } else {
            Err(ServiceError::forbidden("not the owner of this resource"))
        }
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        self.require_any(&[Role::Admin])
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), ServiceError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!("role {} is not allowed", self.role)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_rules() {
        let owner = Uuid::new_v4();
        let user = Actor::new(owner, "u@example.com", Role::User);
        let admin = Actor::new(Uuid::new_v4(), "a@example.com", Role::Admin);
        let employee = Actor::new(Uuid::new_v4(), "e@example.com", Role::Employee);

        assert!(user.can_act_on(Some(owner)));
        assert!(!user.can_act_on(Some(Uuid::new_v4())));
        assert!(!user.can_act_on(None));
        assert!(admin.can_act_on(None));
        assert!(matches!(employee.ensure_owner_or_admin(Some(owner)), Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn role_requirements() {
        let employee = Actor::new(Uuid::new_v4(), "e@example.com", Role::Employee);
        assert!(employee.require_admin().is_err());
        assert!(employee.require_any(&[Role::Employee, Role::Admin]).is_ok());
    }
}
