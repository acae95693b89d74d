//! Driven port for credit ledger persistence.
//!
//! Every method is one store transaction. Mutations that change an entry's
//! status do so through [`EntryState::apply`](crate::domain::EntryState::apply)
//! so adapters persist transitions instead of deciding them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CompactionReport, CreditEntry, CreditItem, EntryFilter, EntryId, EntryState, ItemId,
    ItemPayment, NewCreditEntry, NewCreditItem,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum LedgerRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "ledger repository connection failed: {message}",
        /// A statement or transaction failed and was rolled back.
        Query { message: String } =>
            "ledger repository query failed: {message}",
    }
}

/// An entry with every stored item, paid or not.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub entry: CreditEntry,
    pub items: Vec<CreditItem>,
}

/// Port for reading and mutating ledger entries and items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Insert a pending entry and its first item atomically.
    async fn create_entry(
        &self,
        entry: &NewCreditEntry,
        at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerRepositoryError>;

    /// Charge an item to an entry and reopen it.
    ///
    /// Returns `None` when the entry does not exist.
    async fn add_item(
        &self,
        entry_id: EntryId,
        item: &NewCreditItem,
        at: DateTime<Utc>,
    ) -> Result<Option<CreditItem>, LedgerRepositoryError>;

    /// Mark a pending item paid, promoting the entry when nothing is left.
    async fn pay_item(
        &self,
        entry_id: EntryId,
        item_id: ItemId,
        at: DateTime<Utc>,
    ) -> Result<ItemPayment, LedgerRepositoryError>;

    /// Settle an entry in full without touching its items.
    ///
    /// Returns `None` when the entry does not exist.
    async fn pay_entry(
        &self,
        entry_id: EntryId,
        at: DateTime<Utc>,
    ) -> Result<Option<EntryState>, LedgerRepositoryError>;

    /// Delete an entry with its items and renumber the survivors densely.
    ///
    /// Returns `None` when the entry does not exist; nothing is rewritten then.
    async fn delete_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<CompactionReport>, LedgerRepositoryError>;

    /// Load the entries selected by `filter` with their items.
    async fn load_ledger(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<LedgerRecord>, LedgerRepositoryError>;

    /// Load one entry with its items.
    async fn find_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<LedgerRecord>, LedgerRepositoryError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn query_error_formats_message() {
        let err = LedgerRepositoryError::query("constraint failed");
        assert!(err.to_string().contains("constraint failed"));
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = LedgerRepositoryError::connection("database is locked");
        assert_eq!(
            err.to_string(),
            "ledger repository connection failed: database is locked"
        );
    }
}
