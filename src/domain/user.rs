//! User account types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Error for text columns holding an unknown enum label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {value}")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

/// Account role. Fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            _ => Err(UnknownLabel { kind: "role", value }),
        }
    }
}

/// Lifecycle state. Only Pending -> Approved (or deletion while Pending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Pending,
    Approved,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "Pending",
            UserStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UserStatus {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Pending" => Ok(UserStatus::Pending),
            "Approved" => Ok(UserStatus::Approved),
            _ => Err(UnknownLabel {
                kind: "status",
                value,
            }),
        }
    }
}

/// A row of the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_approved(&self) -> bool {
        self.status == UserStatus::Approved
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Canonical form of an email used as account identifier
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Admin view of a user. Never carries the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub status: UserStatus,
    pub balance: Decimal,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PendingUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            status: user.status,
            balance: user.balance,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Self-service view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub balance: Decimal,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            balance: user.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::try_from("Admin".to_string()).unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "User");
        assert!(Role::try_from("root".to_string()).is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(
            UserStatus::try_from("Pending".to_string()).unwrap(),
            UserStatus::Pending
        );
        assert!(UserStatus::try_from("Rejected".to_string()).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_pending_user_serialization_has_no_digest() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            mobile: "555-0100".to_string(),
            role: Role::User,
            status: UserStatus::Pending,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&PendingUser::from(&user)).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"status\":\"Pending\""));
        assert!(!json.contains("argon2"));
    }
}
