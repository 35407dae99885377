//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Profile, Role};

// =========================================================================
// RegisterCommand / LoginCommand
// =========================================================================

/// Command to open a new (pending) account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

impl RegisterCommand {
    pub fn new(name: String, email: String, password: String, mobile: String) -> Self {
        Self {
            name,
            email,
            password,
            mobile,
        }
    }
}

/// Command to exchange credentials for a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move funds to one of the sender's beneficiaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    pub sender_user_id: Uuid,
    pub beneficiary_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl TransferCommand {
    pub fn new(sender_user_id: Uuid, beneficiary_id: Uuid, amount: Decimal) -> Self {
        Self {
            sender_user_id,
            beneficiary_id,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

// =========================================================================
// AddBeneficiaryCommand
// =========================================================================

/// Command to link a recipient (by account identifier) to the owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBeneficiaryCommand {
    pub owner_user_id: Uuid,
    pub account_identifier: String,
}

impl AddBeneficiaryCommand {
    pub fn new(owner_user_id: Uuid, account_identifier: String) -> Self {
        Self {
            owner_user_id,
            account_identifier,
        }
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResult {
    pub user_id: Uuid,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub profile: Profile,
    pub role: Role,
}

/// Result of a successful transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResult {
    pub transaction_id: Uuid,
    pub sender_user_id: Uuid,
    pub receiver_user_id: Uuid,
    pub amount: Decimal,
}
