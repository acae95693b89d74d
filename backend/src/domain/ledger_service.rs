//! Credit ledger domain service.
//!
//! Implements [`LedgerCommand`] and [`LedgerQuery`] over a
//! [`LedgerRepository`]. Caller input is validated here; every repository call
//! is a single store transaction, so a failed operation leaves no partial
//! state behind.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AddItemRequest, LedgerCommand, LedgerListing, LedgerQuery, LedgerRecord, LedgerRepository,
    LedgerRepositoryError, PayItemRequest,
};
use crate::domain::{
    CompactionReport, CreditEntryInput, CreditItem, EntryDetail, EntryFilter, EntryId,
    EntryState, EntrySummary, Error, ItemPayment, LedgerSnapshot, LedgerTotals,
    LedgerValidationError, NewCreditEntry, NewCreditItem,
};

/// Ledger service implementing the command and query driving ports.
#[derive(Clone)]
pub struct LedgerService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LedgerService<R> {
    /// Create a new service over `repository`, stamping mutations with `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

fn map_repository_error(error: LedgerRepositoryError) -> Error {
    match error {
        LedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ledger repository unavailable: {message}"))
        }
        LedgerRepositoryError::Query { message } => {
            Error::internal(format!("ledger repository error: {message}"))
        }
    }
}

fn map_validation_error(error: LedgerValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

impl From<LedgerValidationError> for Error {
    fn from(error: LedgerValidationError) -> Self {
        map_validation_error(error)
    }
}

fn entry_not_found(entry_id: EntryId) -> Error {
    Error::not_found(format!("credit entry {entry_id} not found"))
}

fn summarise(records: Vec<LedgerRecord>) -> (Vec<EntrySummary>, LedgerTotals) {
    let totals = LedgerTotals::tally(
        records
            .iter()
            .map(|record| (&record.entry, record.items.as_slice())),
    );
    let summaries = records
        .into_iter()
        .map(|record| EntrySummary::from_items(record.entry, record.items))
        .collect();
    (summaries, totals)
}

impl<R> LedgerService<R>
where
    R: LedgerRepository,
{
    async fn listing(&self, filter: EntryFilter) -> Result<LedgerListing, Error> {
        let records = self
            .repository
            .load_ledger(&filter)
            .await
            .map_err(map_repository_error)?;
        let (mut entries, totals) = summarise(records);
        entries.sort_by_key(|summary| Reverse((summary.entry.created_at, summary.entry.id)));
        Ok(LedgerListing { entries, totals })
    }
}

#[async_trait]
impl<R> LedgerCommand for LedgerService<R>
where
    R: LedgerRepository,
{
    async fn add_entry(&self, input: CreditEntryInput) -> Result<EntryDetail, Error> {
        let entry = NewCreditEntry::try_from(input).map_err(map_validation_error)?;
        let record = self
            .repository
            .create_entry(&entry, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        info!(entry_id = %record.entry.id, "credit entry created");
        Ok(EntryDetail::from_items(record.entry, record.items))
    }

    async fn add_item(&self, request: AddItemRequest) -> Result<CreditItem, Error> {
        let item = NewCreditItem::try_from(request.item).map_err(map_validation_error)?;
        let created = self
            .repository
            .add_item(request.entry_id, &item, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| entry_not_found(request.entry_id))?;
        info!(entry_id = %request.entry_id, item_id = %created.id, "credit item added");
        Ok(created)
    }

    async fn pay_item(&self, request: PayItemRequest) -> Result<ItemPayment, Error> {
        let payment = self
            .repository
            .pay_item(request.entry_id, request.item_id, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        if let ItemPayment::Paid {
            entry_state,
            remaining_items,
        } = payment
        {
            info!(
                entry_id = %request.entry_id,
                item_id = %request.item_id,
                remaining_items,
                entry_status = %entry_state.status(),
                "credit item paid"
            );
        }
        Ok(payment)
    }

    async fn pay_entry(&self, entry_id: EntryId) -> Result<EntryState, Error> {
        let state = self
            .repository
            .pay_entry(entry_id, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| entry_not_found(entry_id))?;
        info!(entry_id = %entry_id, "credit entry settled in full");
        Ok(state)
    }

    async fn delete_entry(&self, entry_id: EntryId) -> Result<CompactionReport, Error> {
        let report = self
            .repository
            .delete_entry(entry_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| entry_not_found(entry_id))?;
        info!(
            entry_id = %entry_id,
            surviving_entries = report.surviving_entries,
            surviving_items = report.surviving_items,
            "credit entry deleted and identifiers compacted"
        );
        Ok(report)
    }
}

#[async_trait]
impl<R> LedgerQuery for LedgerService<R>
where
    R: LedgerRepository,
{
    async fn list_entries(&self) -> Result<LedgerListing, Error> {
        self.listing(EntryFilter::all()).await
    }

    async fn search_entries(&self, query: &str) -> Result<LedgerListing, Error> {
        self.listing(EntryFilter::customer(query)).await
    }

    async fn totals(&self, query: Option<String>) -> Result<LedgerTotals, Error> {
        let filter = query
            .as_deref()
            .map(EntryFilter::customer)
            .unwrap_or_default();
        let records = self
            .repository
            .load_ledger(&filter)
            .await
            .map_err(map_repository_error)?;
        Ok(LedgerTotals::tally(
            records
                .iter()
                .map(|record| (&record.entry, record.items.as_slice())),
        ))
    }

    async fn view_entry(&self, entry_id: EntryId) -> Result<EntryDetail, Error> {
        let record = self
            .repository
            .find_entry(entry_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| entry_not_found(entry_id))?;
        Ok(EntryDetail::from_items(record.entry, record.items))
    }

    async fn export_snapshot(&self) -> Result<LedgerSnapshot, Error> {
        let generated_at = self.clock.utc();
        let records = self
            .repository
            .load_ledger(&EntryFilter::all())
            .await
            .map_err(map_repository_error)?;
        let (mut entries, totals) = summarise(records);
        entries.sort_by(|a, b| {
            a.entry
                .customer_name
                .to_lowercase()
                .cmp(&b.entry.customer_name.to_lowercase())
                .then(b.entry.created_at.cmp(&a.entry.created_at))
                .then(b.entry.id.cmp(&a.entry.id))
        });
        Ok(LedgerSnapshot {
            generated_at,
            entries,
            totals,
        })
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
