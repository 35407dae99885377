//! History Handler
//!
//! Transfers the caller took part in, newest first, with direction and
//! description resolved for the caller's side.

use std::sync::Arc;

use crate::domain::{Identity, TransactionView};
use crate::error::AppError;
use crate::store::{BankStore, StoreError};

pub struct HistoryHandler {
    store: Arc<dyn BankStore>,
}

impl HistoryHandler {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, identity: &Identity) -> Result<Vec<TransactionView>, AppError> {
        let rows = self.store.list_transactions(identity.user_id).await?;

        rows.iter()
            .map(|row| {
                row.view_for(identity.user_id).ok_or_else(|| {
                    AppError::from(StoreError::Corrupt(format!(
                        "transaction {} returned for a non-party",
                        row.id
                    )))
                })
            })
            .collect()
    }
}
