//! Ledger entries and their per-viewer projection

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored kind of every ledger row written by the transfer engine
pub const TRANSFER_KIND: &str = "Transfer";

/// Fallback text when a transfer carries no description
const DEFAULT_DESCRIPTION: &str = "Transfer";

/// Maximum stored description length
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A row of the transactions table. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub kind: String,
    pub description: Option<String>,
}

/// A ledger row joined with both parties' names and emails
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TransactionWithParties {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub kind: String,
    pub description: Option<String>,
    pub sender_name: String,
    pub sender_email: String,
    pub receiver_name: String,
    pub receiver_email: String,
}

/// Direction of a transfer relative to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// History row as seen by one party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub transaction_id: Uuid,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub direction: Direction,
    pub description: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub counterpart_name: String,
}

/// Display text of a transfer for one side.
///
/// Stored text that already carries the viewer's prefix is kept verbatim.
pub fn describe(
    direction: Direction,
    stored: Option<&str>,
    counterpart_name: &str,
    counterpart_email: &str,
) -> String {
    match direction {
        Direction::Outgoing => match stored {
            Some(text) if text.starts_with("To ") => text.to_string(),
            _ => format!(
                "To {} ({}): {}",
                counterpart_name,
                counterpart_email,
                stored.unwrap_or(DEFAULT_DESCRIPTION)
            ),
        },
        Direction::Incoming => match stored {
            Some(text) if text.starts_with("From ") => text.to_string(),
            _ => format!(
                "From {}: {}",
                counterpart_name,
                stored.unwrap_or(DEFAULT_DESCRIPTION)
            ),
        },
    }
}

impl TransactionWithParties {
    /// Project this row for `viewer`. Returns None if the viewer is not a party.
    pub fn view_for(&self, viewer: Uuid) -> Option<TransactionView> {
        let (direction, counterpart_name, counterpart_email) = if self.sender_id == viewer {
            (Direction::Outgoing, &self.receiver_name, &self.receiver_email)
        } else if self.receiver_id == viewer {
            (Direction::Incoming, &self.sender_name, &self.sender_email)
        } else {
            return None;
        };

        Some(TransactionView {
            transaction_id: self.id,
            date: self.created_at,
            amount: self.amount.abs(),
            direction,
            description: describe(
                direction,
                self.description.as_deref(),
                counterpart_name,
                counterpart_email,
            ),
            sender_name: self.sender_name.clone(),
            receiver_name: self.receiver_name.clone(),
            counterpart_name: counterpart_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(description: Option<&str>) -> TransactionWithParties {
        TransactionWithParties {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            amount: dec!(1500),
            created_at: Utc::now(),
            kind: TRANSFER_KIND.to_string(),
            description: description.map(str::to_string),
            sender_name: "Alice".to_string(),
            sender_email: "alice@example.com".to_string(),
            receiver_name: "Bob".to_string(),
            receiver_email: "bob@example.com".to_string(),
        }
    }

    #[test]
    fn test_describe_outgoing() {
        assert_eq!(
            describe(Direction::Outgoing, Some("rent"), "Bob", "bob@example.com"),
            "To Bob (bob@example.com): rent"
        );
        assert_eq!(
            describe(Direction::Outgoing, None, "Bob", "bob@example.com"),
            "To Bob (bob@example.com): Transfer"
        );
        assert_eq!(
            describe(Direction::Outgoing, Some("To landlord"), "Bob", "bob@example.com"),
            "To landlord"
        );
    }

    #[test]
    fn test_describe_incoming() {
        assert_eq!(
            describe(Direction::Incoming, Some("rent"), "Alice", "alice@example.com"),
            "From Alice: rent"
        );
        assert_eq!(
            describe(Direction::Incoming, None, "Alice", "alice@example.com"),
            "From Alice: Transfer"
        );
        assert_eq!(
            describe(Direction::Incoming, Some("From payroll"), "Alice", "alice@example.com"),
            "From payroll"
        );
    }

    #[test]
    fn test_view_for_each_party() {
        let row = sample(Some("rent"));

        let outgoing = row.view_for(row.sender_id).unwrap();
        assert_eq!(outgoing.direction, Direction::Outgoing);
        assert_eq!(outgoing.counterpart_name, "Bob");
        assert_eq!(outgoing.amount, dec!(1500));

        let incoming = row.view_for(row.receiver_id).unwrap();
        assert_eq!(incoming.direction, Direction::Incoming);
        assert_eq!(incoming.description, "From Alice: rent");

        assert!(row.view_for(Uuid::new_v4()).is_none());
    }
}
