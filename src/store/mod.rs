//! Storage module
//!
//! The `BankStore` trait is the single persistence seam. `PgStore` backs the
//! running service; `MemoryStore` backs tests and local experiments.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Amount, Balance, Beneficiary, BeneficiaryView, Role, Transaction, TransactionWithParties,
    User, UserStatus,
};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A user row to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: String,
    pub role: Role,
    pub status: UserStatus,
    pub balance: Decimal,
}

impl NewUser {
    /// Self-registered account: Pending, role User, zero balance
    pub fn registration(name: String, email: String, password_hash: String, mobile: String) -> Self {
        Self {
            name,
            email,
            password_hash,
            mobile,
            role: Role::User,
            status: UserStatus::Pending,
            balance: Decimal::ZERO,
        }
    }

    /// Seeded administrator, approved from the start
    pub fn admin(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
            mobile: String::new(),
            role: Role::Admin,
            status: UserStatus::Approved,
            balance: Decimal::ZERO,
        }
    }
}

/// A transfer to be applied atomically
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Amount,
    pub description: Option<String>,
}

/// Persistence operations used by the engines.
///
/// Implementations must make `execute_transfer` atomic: either both balances
/// change and exactly one ledger row exists, or nothing changes.
#[async_trait]
pub trait BankStore: Send + Sync {
    // ---- users ----

    /// Insert a user. Duplicate email yields `StoreError::UniqueViolation`.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Users in the given status, oldest first
    async fn list_users_by_status(&self, status: UserStatus) -> StoreResult<Vec<User>>;

    /// Set status Approved and the initial balance, only while Pending.
    /// Returns None when no Pending user with that id exists.
    async fn approve_user(&self, id: Uuid, balance: Balance) -> StoreResult<Option<User>>;

    /// Delete the user only while Pending. Returns whether a row was deleted.
    async fn delete_pending_user(&self, id: Uuid) -> StoreResult<bool>;

    // ---- beneficiaries ----

    /// Beneficiaries of `owner_id`, oldest first
    async fn list_beneficiaries(&self, owner_id: Uuid) -> StoreResult<Vec<BeneficiaryView>>;

    /// Lookup scoped to the owner; another owner's row is reported as absent
    async fn find_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Beneficiary>>;

    /// Duplicate pair yields `StoreError::UniqueViolation`.
    async fn insert_beneficiary(
        &self,
        owner_id: Uuid,
        beneficiary_user_id: Uuid,
    ) -> StoreResult<Beneficiary>;

    /// Delete scoped to the owner. Returns whether a row was deleted.
    async fn delete_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool>;

    // ---- ledger ----

    /// Lock both parties, re-check status and funds, debit, credit and record
    /// one ledger row. Failed re-checks yield `StoreError::Rejected`.
    async fn execute_transfer(&self, transfer: NewTransfer) -> StoreResult<Transaction>;

    /// Ledger rows where `user_id` is sender or receiver, newest first
    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<TransactionWithParties>>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> StoreResult<()>;
}
