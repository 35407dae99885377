//! In-memory store
//!
//! All tables sit behind one `RwLock`; a transfer holds the write guard for
//! its whole read-check-write, which serializes it against every other write.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Balance, Beneficiary, BeneficiaryView, DomainError, Transaction, TransactionWithParties, User,
    UserStatus,
};
use crate::domain::transaction::TRANSFER_KIND;

use super::{BankStore, NewTransfer, NewUser, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    beneficiaries: Vec<Beneficiary>,
    transactions: Vec<Transaction>,
}

impl Tables {
    fn is_referenced(&self, user_id: Uuid) -> bool {
        self.beneficiaries
            .iter()
            .any(|b| b.owner_user_id == user_id || b.beneficiary_user_id == user_id)
            || self
                .transactions
                .iter()
                .any(|t| t.sender_id == user_id || t.receiver_id == user_id)
    }

    fn balance_of(&self, user: &User) -> StoreResult<Balance> {
        Balance::new(user.balance)
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", user.id, e)))
    }
}

/// Store backed by process memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BankStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            mobile: user.mobile,
            role: user.role,
            status: user.status,
            balance: user.balance,
            created_at: Utc::now(),
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users_by_status(&self, status: UserStatus) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.status == status)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn approve_user(&self, id: Uuid, balance: Balance) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.status == UserStatus::Pending => {
                user.status = UserStatus::Approved;
                user.balance = balance.value();
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_pending_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let pending = matches!(tables.users.get(&id), Some(u) if u.status == UserStatus::Pending);
        if !pending {
            return Ok(false);
        }
        if tables.is_referenced(id) {
            return Err(StoreError::ForeignKeyViolation(
                "users referenced by beneficiaries or transactions".to_string(),
            ));
        }

        tables.users.remove(&id);
        Ok(true)
    }

    async fn list_beneficiaries(&self, owner_id: Uuid) -> StoreResult<Vec<BeneficiaryView>> {
        let tables = self.tables.read().await;

        let mut views = Vec::new();
        for b in tables.beneficiaries.iter().filter(|b| b.owner_user_id == owner_id) {
            let recipient = tables.users.get(&b.beneficiary_user_id).ok_or_else(|| {
                StoreError::Corrupt(format!("beneficiary {} has no recipient row", b.id))
            })?;
            views.push(BeneficiaryView {
                beneficiary_id: b.id,
                beneficiary_user_id: recipient.id,
                name: recipient.name.clone(),
                account_identifier: recipient.email.clone(),
                date_added: b.date_added,
            });
        }
        // Stable sort keeps insertion order for identical timestamps
        views.sort_by(|a, b| a.date_added.cmp(&b.date_added));
        Ok(views)
    }

    async fn find_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Beneficiary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .beneficiaries
            .iter()
            .find(|b| b.id == id && b.owner_user_id == owner_id)
            .cloned())
    }

    async fn insert_beneficiary(
        &self,
        owner_id: Uuid,
        beneficiary_user_id: Uuid,
    ) -> StoreResult<Beneficiary> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&owner_id) || !tables.users.contains_key(&beneficiary_user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "beneficiaries reference a missing user".to_string(),
            ));
        }
        if owner_id == beneficiary_user_id {
            return Err(DomainError::SelfReference.into());
        }
        if tables
            .beneficiaries
            .iter()
            .any(|b| b.owner_user_id == owner_id && b.beneficiary_user_id == beneficiary_user_id)
        {
            return Err(StoreError::UniqueViolation(
                "beneficiaries_owner_user_id_beneficiary_user_id_key".to_string(),
            ));
        }

        let row = Beneficiary {
            id: Uuid::new_v4(),
            owner_user_id: owner_id,
            beneficiary_user_id,
            date_added: Utc::now(),
        };
        tables.beneficiaries.push(row.clone());
        Ok(row)
    }

    async fn delete_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.beneficiaries.len();
        tables
            .beneficiaries
            .retain(|b| !(b.id == id && b.owner_user_id == owner_id));
        Ok(tables.beneficiaries.len() < before)
    }

    async fn execute_transfer(&self, transfer: NewTransfer) -> StoreResult<Transaction> {
        let mut tables = self.tables.write().await;

        let sender = tables
            .users
            .get(&transfer.sender_id)
            .filter(|u| u.is_approved())
            .ok_or(DomainError::SenderUnavailable)?;
        let receiver = tables
            .users
            .get(&transfer.receiver_id)
            .filter(|u| u.is_approved())
            .ok_or(DomainError::RecipientUnavailable)?;

        let sender_balance = tables.balance_of(sender)?;
        let receiver_balance = tables.balance_of(receiver)?;

        if !sender_balance.is_sufficient_for(&transfer.amount) {
            return Err(DomainError::insufficient_funds(
                transfer.amount.value(),
                sender_balance.value(),
            )
            .into());
        }

        // Both new balances are computed before either row is touched
        let debited = sender_balance
            .debit(&transfer.amount)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let credited = receiver_balance
            .credit(&transfer.amount)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        if let Some(sender) = tables.users.get_mut(&transfer.sender_id) {
            sender.balance = debited.value();
        }
        if let Some(receiver) = tables.users.get_mut(&transfer.receiver_id) {
            receiver.balance = credited.value();
        }

        let row = Transaction {
            id: Uuid::new_v4(),
            sender_id: transfer.sender_id,
            receiver_id: transfer.receiver_id,
            amount: transfer.amount.value(),
            created_at: Utc::now(),
            kind: TRANSFER_KIND.to_string(),
            description: transfer.description,
        };
        tables.transactions.push(row.clone());
        Ok(row)
    }

    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<TransactionWithParties>> {
        let tables = self.tables.read().await;

        let mut rows = Vec::new();
        for t in tables
            .transactions
            .iter()
            .filter(|t| t.sender_id == user_id || t.receiver_id == user_id)
        {
            let (sender, receiver) = match (tables.users.get(&t.sender_id), tables.users.get(&t.receiver_id)) {
                (Some(s), Some(r)) => (s, r),
                _ => return Err(StoreError::Corrupt(format!("transaction {} has a missing party", t.id))),
            };
            rows.push(TransactionWithParties {
                id: t.id,
                sender_id: t.sender_id,
                receiver_id: t.receiver_id,
                amount: t.amount,
                created_at: t.created_at,
                kind: t.kind.clone(),
                description: t.description.clone(),
                sender_name: sender.name.clone(),
                sender_email: sender.email.clone(),
                receiver_name: receiver.name.clone(),
                receiver_email: receiver.email.clone(),
            });
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
