//! Postgres store
//!
//! Transfers run in one database transaction with both user rows locked
//! (`FOR UPDATE`, ascending id) so concurrent transfers cannot interleave.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::domain::{
    Balance, Beneficiary, BeneficiaryView, DomainError, Transaction, TransactionWithParties, User,
    UserStatus,
};
use crate::domain::transaction::TRANSFER_KIND;

use super::{BankStore, NewTransfer, NewUser, StoreError, StoreResult};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, mobile, role, status, balance, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock a user row inside the transaction
    async fn lock_user(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: Uuid,
    ) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl BankStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, mobile, role, status, balance)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.mobile)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.balance)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users_by_status(&self, status: UserStatus) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE status = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn approve_user(&self, id: Uuid, balance: Balance) -> StoreResult<Option<User>> {
        // Conditional update: of two concurrent approvals only one matches
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET status = 'Approved', balance = $2
            WHERE id = $1 AND status = 'Pending'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(balance.value())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_pending_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND status = 'Pending'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_beneficiaries(&self, owner_id: Uuid) -> StoreResult<Vec<BeneficiaryView>> {
        let views = sqlx::query_as::<_, BeneficiaryView>(
            r#"
            SELECT b.id AS beneficiary_id,
                   u.id AS beneficiary_user_id,
                   u.name,
                   u.email AS account_identifier,
                   b.date_added
            FROM beneficiaries b
            JOIN users u ON u.id = b.beneficiary_user_id
            WHERE b.owner_user_id = $1
            ORDER BY b.date_added ASC, b.id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(views)
    }

    async fn find_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Beneficiary>> {
        let row = sqlx::query_as::<_, Beneficiary>(
            r#"
            SELECT id, owner_user_id, beneficiary_user_id, date_added
            FROM beneficiaries
            WHERE id = $1 AND owner_user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_beneficiary(
        &self,
        owner_id: Uuid,
        beneficiary_user_id: Uuid,
    ) -> StoreResult<Beneficiary> {
        let row = sqlx::query_as::<_, Beneficiary>(
            r#"
            INSERT INTO beneficiaries (owner_user_id, beneficiary_user_id)
            VALUES ($1, $2)
            RETURNING id, owner_user_id, beneficiary_user_id, date_added
            "#,
        )
        .bind(owner_id)
        .bind(beneficiary_user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_beneficiary(&self, id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM beneficiaries WHERE id = $1 AND owner_user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn execute_transfer(&self, transfer: NewTransfer) -> StoreResult<Transaction> {
        // Dropping `tx` without commit rolls back every statement below
        let mut tx = self.pool.begin().await?;

        // Lock in ascending id order so opposing transfers cannot deadlock
        let (first, second) = if transfer.sender_id < transfer.receiver_id {
            (transfer.sender_id, transfer.receiver_id)
        } else {
            (transfer.receiver_id, transfer.sender_id)
        };
        let first_row = Self::lock_user(&mut tx, first).await?;
        let second_row = Self::lock_user(&mut tx, second).await?;
        let (sender, receiver) = if first == transfer.sender_id {
            (first_row, second_row)
        } else {
            (second_row, first_row)
        };

        let sender = sender
            .filter(User::is_approved)
            .ok_or(DomainError::SenderUnavailable)?;
        let receiver = receiver
            .filter(User::is_approved)
            .ok_or(DomainError::RecipientUnavailable)?;

        let available = Balance::new(sender.balance)
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", sender.id, e)))?;
        if !available.is_sufficient_for(&transfer.amount) {
            return Err(DomainError::insufficient_funds(
                transfer.amount.value(),
                available.value(),
            )
            .into());
        }

        sqlx::query("UPDATE users SET balance = balance - $2 WHERE id = $1")
            .bind(sender.id)
            .bind(transfer.amount.value())
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET balance = balance + $2 WHERE id = $1")
            .bind(receiver.id)
            .bind(transfer.amount.value())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (sender_id, receiver_id, amount, kind, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sender_id, receiver_id, amount, created_at, kind, description
            "#,
        )
        .bind(sender.id)
        .bind(receiver.id)
        .bind(transfer.amount.value())
        .bind(TRANSFER_KIND)
        .bind(&transfer.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<TransactionWithParties>> {
        let rows = sqlx::query_as::<_, TransactionWithParties>(
            r#"
            SELECT t.id, t.sender_id, t.receiver_id, t.amount, t.created_at, t.kind, t.description,
                   s.name AS sender_name, s.email AS sender_email,
                   r.name AS receiver_name, r.email AS receiver_email
            FROM transactions t
            JOIN users s ON s.id = t.sender_id
            JOIN users r ON r.id = t.receiver_id
            WHERE t.sender_id = $1 OR t.receiver_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::verify_connection(&self.pool)
            .await
            .map_err(StoreError::from)
    }
}
