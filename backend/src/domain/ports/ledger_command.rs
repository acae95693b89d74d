//! Driving port for ledger mutations.
//!
//! Inbound adapters hand over raw caller input; the service behind this port
//! validates it and runs each mutation as a single store transaction.

use async_trait::async_trait;

use crate::domain::{
    CompactionReport, CreditEntryInput, CreditItem, CreditItemInput, EntryDetail, EntryId,
    EntryState, Error, ItemId, ItemPayment,
};

/// Request to charge another item to an existing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    pub entry_id: EntryId,
    pub item: CreditItemInput,
}

/// Request to pay one item of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayItemRequest {
    pub entry_id: EntryId,
    pub item_id: ItemId,
}

/// Ledger mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Open a new entry with its first item.
    async fn add_entry(&self, input: CreditEntryInput) -> Result<EntryDetail, Error>;

    /// Add an item to an entry, reopening it if it was paid.
    async fn add_item(&self, request: AddItemRequest) -> Result<CreditItem, Error>;

    /// Pay one item. A pair that matches nothing is a no-op, not an error.
    async fn pay_item(&self, request: PayItemRequest) -> Result<ItemPayment, Error>;

    /// Settle a whole entry.
    async fn pay_entry(&self, entry_id: EntryId) -> Result<EntryState, Error>;

    /// Delete an entry and compact the remaining identifiers.
    async fn delete_entry(&self, entry_id: EntryId) -> Result<CompactionReport, Error>;
}
