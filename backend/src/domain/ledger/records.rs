//! Stored ledger records and their identifiers.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{EntryState, LedgerValidationError, Money, PaymentStatus, Quantity};

/// Sequential identifier of a ledger entry.
///
/// Identifiers are dense and may be reassigned when an entry is deleted, so
/// they are only stable between deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(i32);

impl EntryId {
    /// Validate a positive identifier.
    pub fn new(value: i32) -> Result<Self, LedgerValidationError> {
        if value < 1 {
            return Err(LedgerValidationError::InvalidEntryId { value });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential identifier of a credit item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(i32);

impl ItemId {
    /// Validate a positive identifier.
    pub fn new(value: i32) -> Result<Self, LedgerValidationError> {
        if value < 1 {
            return Err(LedgerValidationError::InvalidItemId { value });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer's credit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEntry {
    pub id: EntryId,
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub estimated_payment_date: NaiveDate,
    #[serde(flatten)]
    pub state: EntryState,
    pub created_at: DateTime<Utc>,
}

/// One product bought on credit under an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditItem {
    pub id: ItemId,
    pub entry_id: EntryId,
    pub product: String,
    pub cost: Money,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub added_at: DateTime<Utc>,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl CreditItem {
    /// Whether the item still counts toward the entry's balance.
    pub fn is_outstanding(&self) -> bool {
        self.status == PaymentStatus::Pending
    }
}
