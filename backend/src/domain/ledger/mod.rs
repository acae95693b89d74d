//! Credit ledger domain types.
//!
//! A ledger entry records one customer's store credit. Its balance is made of
//! line items; an item stops counting toward the balance once it is paid, and
//! the entry's own status moves through [`EntryState`] as items are added or
//! settled. Read models in [`views`] are derived here rather than in SQL so
//! the aggregation rules are covered without a database.

use std::fmt;

mod input;
mod money;
mod records;
mod status;
mod views;

pub use input::{CreditEntryInput, CreditItemInput, NewCreditEntry, NewCreditItem};
pub use money::{Money, MoneyError, Quantity};
pub use records::{CreditEntry, CreditItem, EntryId, ItemId};
pub use status::{EntryState, LedgerEvent, ParsePaymentStatusError, PaymentStatus};
pub use views::{
    CompactionReport, EntryDetail, EntryFilter, EntrySummary, ItemPayment, LedgerSnapshot,
    LedgerTotals,
};

/// Validation errors raised while building ledger inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerValidationError {
    EmptyCustomerName,
    EmptyProduct,
    EmptyCost,
    InvalidCost(MoneyError),
    InvalidUnitPrice(MoneyError),
    InvalidQuantity { value: String },
    EmptyPaymentDate,
    InvalidPaymentDate { value: String },
    InvalidEntryId { value: i32 },
    InvalidItemId { value: i32 },
}

impl LedgerValidationError {
    /// Request field the error refers to, as named by inbound payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyCustomerName => "customerName",
            Self::EmptyProduct => "product",
            Self::EmptyCost | Self::InvalidCost(_) => "cost",
            Self::InvalidUnitPrice(_) => "unitPrice",
            Self::InvalidQuantity { .. } => "quantity",
            Self::EmptyPaymentDate | Self::InvalidPaymentDate { .. } => "estimatedPaymentDate",
            Self::InvalidEntryId { .. } => "id",
            Self::InvalidItemId { .. } => "itemId",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyCustomerName => "empty_customer_name",
            Self::EmptyProduct => "empty_product",
            Self::EmptyCost => "empty_cost",
            Self::InvalidCost(_) => "invalid_cost",
            Self::InvalidUnitPrice(_) => "invalid_unit_price",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::EmptyPaymentDate => "empty_estimated_payment_date",
            Self::InvalidPaymentDate { .. } => "invalid_estimated_payment_date",
            Self::InvalidEntryId { .. } => "invalid_entry_id",
            Self::InvalidItemId { .. } => "invalid_item_id",
        }
    }
}

impl fmt::Display for LedgerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCustomerName => write!(f, "customer name must not be empty"),
            Self::EmptyProduct => write!(f, "product must not be empty"),
            Self::EmptyCost => write!(f, "cost must not be empty"),
            Self::InvalidCost(err) => write!(f, "cost {err}"),
            Self::InvalidUnitPrice(err) => write!(f, "unit price {err}"),
            Self::InvalidQuantity { value } => {
                write!(f, "quantity must be a whole number of at least 1 (got {value:?})")
            }
            Self::EmptyPaymentDate => write!(f, "estimated payment date must not be empty"),
            Self::InvalidPaymentDate { value } => write!(
                f,
                "estimated payment date must use the YYYY-MM-DD format (got {value:?})"
            ),
            Self::InvalidEntryId { value } => {
                write!(f, "entry id must be a positive integer (got {value})")
            }
            Self::InvalidItemId { value } => {
                write!(f, "item id must be a positive integer (got {value})")
            }
        }
    }
}

impl std::error::Error for LedgerValidationError {}
