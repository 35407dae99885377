//! Beneficiary relationships
//!
//! A directed owner -> recipient link. Transfers may only target a recipient
//! the sender has registered here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the beneficiaries table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Beneficiary {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub beneficiary_user_id: Uuid,
    pub date_added: DateTime<Utc>,
}

/// A beneficiary joined with the recipient's public details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryView {
    pub beneficiary_id: Uuid,
    pub beneficiary_user_id: Uuid,
    pub name: String,
    /// Recipient email, used as the account identifier
    pub account_identifier: String,
    pub date_added: DateTime<Utc>,
}
