//! Store Errors

use crate::domain::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a store operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Unique index violated (duplicate email, duplicate beneficiary pair)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Restrict-on-delete or missing parent row
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A business rule failed when re-checked under lock
    #[error(transparent)]
    Rejected(#[from] DomainError),

    /// Stored data violates an invariant
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            let constraint = db.constraint().unwrap_or_default().to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(e)
    }
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}
