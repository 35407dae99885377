//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;

/// Business rule violations raised by the engines.
///
/// These are independent of the web/infrastructure layer; `AppError`
/// decides how each one is rendered over HTTP.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount is zero, negative, over-precise or too large
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Caller acts on a resource that is not theirs, or lacks the Admin role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Sender does not exist or is not approved
    #[error("Sender account is not available")]
    SenderUnavailable,

    /// Beneficiary does not exist or is not owned by the caller
    #[error("Beneficiary not found")]
    BeneficiaryNotFound,

    /// Recipient behind the beneficiary is missing or not approved
    #[error("Recipient account is not available")]
    RecipientUnavailable,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    /// Email already registered
    #[error("Email is already registered")]
    DuplicateIdentity,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is pending admin approval")]
    NotApproved,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User is already approved")]
    AlreadyApproved,

    /// Operation not allowed in the current lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No approved user with the given account identifier
    #[error("Recipient not found or not approved")]
    RecipientNotFound,

    #[error("Administrators cannot be added as beneficiaries")]
    ForbiddenRecipient,

    #[error("You cannot add yourself as a beneficiary")]
    SelfReference,

    #[error("Beneficiary already exists")]
    AlreadyExists,
}

impl DomainError {
    pub fn insufficient_funds(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn user_not_found(id: impl ToString) -> Self {
        Self::UserNotFound(id.to_string())
    }
}
