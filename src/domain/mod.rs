//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod beneficiary;
pub mod error;
pub mod identity;
pub mod transaction;
pub mod user;

pub use amount::{Amount, AmountError, Balance};
pub use beneficiary::{Beneficiary, BeneficiaryView};
pub use error::DomainError;
pub use identity::Identity;
pub use transaction::{describe, Direction, Transaction, TransactionView, TransactionWithParties};
pub use user::{normalize_email, PendingUser, Profile, Role, User, UserStatus};
