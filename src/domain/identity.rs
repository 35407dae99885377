//! Caller Identity
//!
//! The authenticated principal of a request. Produced from a verified token
//! and passed explicitly into every engine call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;
use super::user::Role;

/// Authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Ensure the caller acts on their own resources
    pub fn require_self(&self, owner_id: Uuid) -> Result<(), DomainError> {
        if self.user_id != owner_id {
            return Err(DomainError::forbidden(
                "You can only access your own account",
            ));
        }
        Ok(())
    }

    /// Ensure the caller holds the Admin role
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if !self.is_admin() {
            return Err(DomainError::forbidden("Administrator role required"));
        }
        Ok(())
    }
}
