//! Driving port for ledger reads.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{EntryDetail, EntryId, EntrySummary, Error, LedgerSnapshot, LedgerTotals};

/// Entries with the totals computed over the same selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerListing {
    /// Newest entries first.
    pub entries: Vec<EntrySummary>,
    pub totals: LedgerTotals,
}

/// Ledger read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Every entry with its outstanding balance.
    async fn list_entries(&self) -> Result<LedgerListing, Error>;

    /// Entries whose customer name contains `query`, ignoring case.
    async fn search_entries(&self, query: &str) -> Result<LedgerListing, Error>;

    /// Sums over every entry, or only matching customers when `query` is set.
    async fn totals(&self, query: Option<String>) -> Result<LedgerTotals, Error>;

    /// One entry with its items and outstanding total.
    async fn view_entry(&self, entry_id: EntryId) -> Result<EntryDetail, Error>;

    /// Everything needed to render a ledger report.
    async fn export_snapshot(&self) -> Result<LedgerSnapshot, Error>;
}
