//! Admin Handler
//!
//! Approval workflow for newly registered accounts. Callers must already
//! hold the Admin role; `Identity::require_admin` is checked here as well.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Balance, DomainError, Identity, PendingUser, User, UserStatus};
use crate::error::AppError;
use crate::store::{BankStore, StoreError};

pub struct AdminHandler {
    store: Arc<dyn BankStore>,
}

impl AdminHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Accounts waiting for approval, oldest first
    pub async fn list_pending(&self, identity: &Identity) -> Result<Vec<PendingUser>, AppError> {
        identity.require_admin()?;

        let users = self.store.list_users_by_status(UserStatus::Pending).await?;
        Ok(users.iter().map(PendingUser::from).collect())
    }

    /// Approve a Pending account and grant its initial balance
    pub async fn approve(
        &self,
        identity: &Identity,
        user_id: Uuid,
        initial_balance: Decimal,
    ) -> Result<User, AppError> {
        identity.require_admin()?;

        let balance = Balance::new(initial_balance)
            .map_err(|e| DomainError::InvalidAmount(e.to_string()))?;

        if let Some(user) = self.store.approve_user(user_id, balance).await? {
            tracing::info!(
                admin = %identity.user_id,
                user_id = %user.id,
                balance = %balance,
                "User approved"
            );
            return Ok(user);
        }

        // Nothing matched the conditional update; find out why
        match self.store.find_user(user_id).await? {
            None => Err(DomainError::user_not_found(user_id).into()),
            Some(_) => {
                tracing::warn!(user_id = %user_id, "Approval rejected: user is not pending");
                Err(DomainError::AlreadyApproved.into())
            }
        }
    }

    /// Delete a Pending account
    pub async fn reject(&self, identity: &Identity, user_id: Uuid) -> Result<User, AppError> {
        identity.require_admin()?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        if user.status != UserStatus::Pending {
            tracing::warn!(user_id = %user_id, status = %user.status, "Rejection refused");
            return Err(DomainError::InvalidState(format!(
                "Only pending users can be rejected (status is {})",
                user.status
            ))
            .into());
        }

        match self.store.delete_pending_user(user_id).await {
            Ok(true) => {
                tracing::info!(admin = %identity.user_id, user_id = %user_id, "User rejected");
                Ok(user)
            }
            // Approved or deleted in the meantime
            Ok(false) => Err(DomainError::InvalidState(
                "User is no longer pending".to_string(),
            )
            .into()),
            Err(StoreError::ForeignKeyViolation(constraint)) => {
                tracing::warn!(user_id = %user_id, constraint = %constraint, "Rejection blocked by references");
                Err(DomainError::InvalidState(
                    "User is still referenced by other records".to_string(),
                )
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
