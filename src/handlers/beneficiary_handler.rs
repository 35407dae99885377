//! Beneficiary Handler
//!
//! Owner-scoped management of transfer recipients.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{normalize_email, BeneficiaryView, DomainError, Identity};
use crate::error::AppError;
use crate::store::BankStore;

use super::AddBeneficiaryCommand;

pub struct BeneficiaryHandler {
    store: Arc<dyn BankStore>,
}

impl BeneficiaryHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Beneficiaries of `owner_id`, oldest first
    pub async fn list(
        &self,
        identity: &Identity,
        owner_id: Uuid,
    ) -> Result<Vec<BeneficiaryView>, AppError> {
        identity.require_self(owner_id)?;
        Ok(self.store.list_beneficiaries(owner_id).await?)
    }

    /// Link an approved, non-admin recipient to the owner
    pub async fn add(
        &self,
        identity: &Identity,
        command: AddBeneficiaryCommand,
    ) -> Result<BeneficiaryView, AppError> {
        identity.require_self(command.owner_user_id)?;
        let owner_id = command.owner_user_id;
        let email = normalize_email(&command.account_identifier);

        let recipient = self
            .store
            .find_user_by_email(&email)
            .await?
            .filter(|u| u.is_approved())
            .ok_or(DomainError::RecipientNotFound)?;

        if recipient.is_admin() {
            return Err(DomainError::ForbiddenRecipient.into());
        }
        if recipient.id == owner_id {
            return Err(DomainError::SelfReference.into());
        }

        let existing = self.store.list_beneficiaries(owner_id).await?;
        if existing.iter().any(|b| b.beneficiary_user_id == recipient.id) {
            return Err(DomainError::AlreadyExists.into());
        }

        let row = self
            .store
            .insert_beneficiary(owner_id, recipient.id)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::Domain(DomainError::AlreadyExists)
                } else {
                    e.into()
                }
            })?;

        tracing::info!(
            owner = %owner_id,
            beneficiary_id = %row.id,
            recipient = %recipient.id,
            "Beneficiary added"
        );

        Ok(BeneficiaryView {
            beneficiary_id: row.id,
            beneficiary_user_id: recipient.id,
            name: recipient.name,
            account_identifier: recipient.email,
            date_added: row.date_added,
        })
    }

    /// Remove a beneficiary owned by the caller
    pub async fn remove(&self, identity: &Identity, beneficiary_id: Uuid) -> Result<(), AppError> {
        if !self
            .store
            .delete_beneficiary(beneficiary_id, identity.user_id)
            .await?
        {
            return Err(DomainError::BeneficiaryNotFound.into());
        }

        tracing::info!(owner = %identity.user_id, beneficiary_id = %beneficiary_id, "Beneficiary removed");
        Ok(())
    }
}
