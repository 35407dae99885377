//! Transfer Handler
//!
//! Moves funds from a user to one of their beneficiaries. Preconditions are
//! checked in a fixed order; the store re-checks them under lock.

use std::sync::Arc;

use crate::domain::transaction::MAX_DESCRIPTION_LEN;
use crate::domain::{Amount, DomainError, Identity};
use crate::error::AppError;
use crate::store::{BankStore, NewTransfer, StoreError};

use super::{TransferCommand, TransferResult};

// =========================================================================
// TransferHandler
// =========================================================================

/// Handler for transfers between approved users
pub struct TransferHandler {
    store: Arc<dyn BankStore>,
}

impl TransferHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    /// Execute the transfer command
    pub async fn execute(
        &self,
        command: TransferCommand,
        identity: &Identity,
    ) -> Result<TransferResult, AppError> {
        // 1. Amount, before any balance is read
        let amount =
            Amount::new(command.amount).map_err(|e| DomainError::InvalidAmount(e.to_string()))?;

        // 2. Caller must be the sender
        if let Err(e) = identity.require_self(command.sender_user_id) {
            tracing::warn!(
                caller = %identity.user_id,
                sender = %command.sender_user_id,
                "Transfer rejected: caller is not the sender"
            );
            return Err(e.into());
        }

        let description = command
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(d) = &description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(AppError::InvalidRequest(format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }

        // 3. Sender exists and is approved
        let sender = self
            .store
            .find_user(command.sender_user_id)
            .await?
            .filter(|u| u.is_approved())
            .ok_or(DomainError::SenderUnavailable)?;

        // 4. Beneficiary exists and belongs to the sender
        let beneficiary = self
            .store
            .find_beneficiary(command.beneficiary_id, sender.id)
            .await?
            .ok_or(DomainError::BeneficiaryNotFound)?;

        // 5. Recipient exists and is approved
        let receiver = self
            .store
            .find_user(beneficiary.beneficiary_user_id)
            .await?
            .filter(|u| u.is_approved())
            .ok_or(DomainError::RecipientUnavailable)?;

        // 6. Funds
        if sender.balance < amount.value() {
            tracing::warn!(
                sender = %sender.id,
                amount = %amount,
                "Transfer rejected: insufficient funds"
            );
            return Err(DomainError::insufficient_funds(amount.value(), sender.balance).into());
        }

        let transaction = self
            .store
            .execute_transfer(NewTransfer {
                sender_id: sender.id,
                receiver_id: receiver.id,
                amount,
                description,
            })
            .await
            .map_err(|e| match e {
                StoreError::Rejected(domain) => {
                    tracing::warn!(sender = %sender.id, error = %domain, "Transfer rejected under lock");
                    AppError::Domain(domain)
                }
                other => {
                    tracing::error!(sender = %sender.id, receiver = %receiver.id, error = ?other, "Transfer failed");
                    AppError::TransferFailed
                }
            })?;

        tracing::info!(
            transaction_id = %transaction.id,
            sender = %sender.id,
            receiver = %receiver.id,
            amount = %amount,
            "Transfer completed"
        );

        Ok(TransferResult {
            transaction_id: transaction.id,
            sender_user_id: sender.id,
            receiver_user_id: receiver.id,
            amount: amount.value(),
        })
    }
}
