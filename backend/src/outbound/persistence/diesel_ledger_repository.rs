//! SQLite-backed `LedgerRepository` implementation using Diesel.
//!
//! Each port call checks out a pooled connection on Tokio's blocking pool and
//! runs as one transaction. Mutations use `BEGIN IMMEDIATE` so the write lock
//! is held before anything is read, which serialises concurrent payments and
//! makes compaction exclusive.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::ports::{LedgerRecord, LedgerRepository, LedgerRepositoryError};
use crate::domain::{
    CompactionReport, CreditEntry, CreditItem, EntryFilter, EntryId, EntryState, ItemId,
    ItemPayment, LedgerEvent, Money, NewCreditEntry, NewCreditItem, PaymentStatus, Quantity,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::ledger_compaction::compact_identifiers;
use super::models::{
    CreditEntryRow, CreditItemRow, EntryStateUpdate, NewCreditEntryRow, NewCreditItemRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{credit_entries, credit_items};

/// Diesel-backed implementation of the `LedgerRepository` port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, operation: F) -> Result<T, LedgerRepositoryError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            operation(&mut conn).map_err(StoreError::into_repository_error)
        })
        .await
        .map_err(|err| LedgerRepositoryError::query(format!("database task failed: {err}")))?
    }
}

/// Failure inside a transaction body.
///
/// Diesel needs `From<diesel::result::Error>` for the transaction error type;
/// rows that cannot be mapped back into domain values roll back as well.
#[derive(Debug)]
enum StoreError {
    Diesel(diesel::result::Error),
    Corrupt(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl StoreError {
    fn into_repository_error(self) -> LedgerRepositoryError {
        match self {
            Self::Diesel(error) => map_diesel_error(error),
            Self::Corrupt(message) => LedgerRepositoryError::query(message),
        }
    }
}

fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    map_basic_pool_error(error, |message| LedgerRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerRepositoryError {
    map_basic_diesel_error(
        error,
        |message| LedgerRepositoryError::query(message),
        |message| LedgerRepositoryError::connection(message),
    )
}

fn corrupt(what: &str, id: i32, detail: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("stored {what} {id} is invalid: {detail}"))
}

fn to_centavos(amount: Money) -> Result<i64, LedgerRepositoryError> {
    amount
        .to_centavos()
        .map_err(|err| LedgerRepositoryError::query(format!("amount not storable: {err}")))
}

fn stored_state(row: &CreditEntryRow) -> Result<EntryState, StoreError> {
    let status =
        PaymentStatus::from_str(&row.status).map_err(|err| corrupt("entry", row.id, err))?;
    Ok(EntryState::from_parts(status, row.paid_at.map(|at| at.and_utc())))
}

fn row_to_entry(row: CreditEntryRow) -> Result<CreditEntry, StoreError> {
    let state = stored_state(&row)?;
    Ok(CreditEntry {
        id: EntryId::new(row.id).map_err(|err| corrupt("entry", row.id, err))?,
        customer_name: row.customer_name,
        phone_number: row.phone_number,
        estimated_payment_date: row.estimated_payment_date,
        state,
        created_at: row.created_at.and_utc(),
    })
}

fn row_to_item(row: CreditItemRow) -> Result<CreditItem, StoreError> {
    let id = row.id;
    Ok(CreditItem {
        id: ItemId::new(id).map_err(|err| corrupt("item", id, err))?,
        entry_id: EntryId::new(row.entry_id).map_err(|err| corrupt("item", id, err))?,
        product: row.product,
        cost: Money::from_centavos(row.cost).map_err(|err| corrupt("item", id, err))?,
        quantity: Quantity::new(row.quantity)
            .ok_or_else(|| corrupt("item", id, format!("quantity {}", row.quantity)))?,
        unit_price: Money::from_centavos(row.unit_price)
            .map_err(|err| corrupt("item", id, err))?,
        added_at: row.added_at.and_utc(),
        status: PaymentStatus::from_str(&row.status).map_err(|err| corrupt("item", id, err))?,
        paid_at: row.paid_at.map(|at| at.and_utc()),
    })
}

fn find_entry_row(
    conn: &mut SqliteConnection,
    entry_id: i32,
) -> Result<Option<CreditEntryRow>, StoreError> {
    Ok(credit_entries::table
        .find(entry_id)
        .select(CreditEntryRow::as_select())
        .first(conn)
        .optional()?)
}

fn persist_state(
    conn: &mut SqliteConnection,
    entry_id: i32,
    state: EntryState,
) -> Result<(), StoreError> {
    diesel::update(credit_entries::table.find(entry_id))
        .set(&EntryStateUpdate {
            status: state.status().as_str(),
            paid_at: state.paid_at().map(|at| at.naive_utc()),
        })
        .execute(conn)?;
    Ok(())
}

fn load_items(
    conn: &mut SqliteConnection,
    entry_ids: Option<&[i32]>,
) -> Result<Vec<CreditItemRow>, StoreError> {
    let mut query = credit_items::table
        .select(CreditItemRow::as_select())
        .order((credit_items::added_at.desc(), credit_items::id.desc()))
        .into_boxed();
    if let Some(ids) = entry_ids {
        query = query.filter(credit_items::entry_id.eq_any(ids));
    }
    Ok(query.load(conn)?)
}

/// Pair entries with their items, keeping entry order.
fn assemble(
    entries: Vec<CreditEntryRow>,
    items: Vec<CreditItemRow>,
) -> Result<Vec<LedgerRecord>, StoreError> {
    let mut grouped: HashMap<i32, Vec<CreditItem>> = HashMap::new();
    for row in items {
        let entry_id = row.entry_id;
        grouped.entry(entry_id).or_default().push(row_to_item(row)?);
    }
    entries
        .into_iter()
        .map(|row| {
            let items = grouped.remove(&row.id).unwrap_or_default();
            Ok(LedgerRecord {
                entry: row_to_entry(row)?,
                items,
            })
        })
        .collect()
}

/// Owned item values moved onto the blocking pool.
struct NewItemValues {
    product: String,
    cost: i64,
    quantity: i32,
    unit_price: i64,
    added_at: NaiveDateTime,
}

impl NewItemValues {
    fn try_new(item: &NewCreditItem, at: DateTime<Utc>) -> Result<Self, LedgerRepositoryError> {
        Ok(Self {
            product: item.product().to_owned(),
            cost: to_centavos(item.cost())?,
            quantity: item.quantity().get(),
            unit_price: to_centavos(item.unit_price())?,
            added_at: at.naive_utc(),
        })
    }

    fn insert(
        &self,
        conn: &mut SqliteConnection,
        entry_id: i32,
    ) -> Result<CreditItemRow, StoreError> {
        Ok(diesel::insert_into(credit_items::table)
            .values(&NewCreditItemRow {
                entry_id,
                product: &self.product,
                cost: self.cost,
                quantity: self.quantity,
                unit_price: self.unit_price,
                added_at: self.added_at,
                status: PaymentStatus::Pending.as_str(),
            })
            .returning(CreditItemRow::as_returning())
            .get_result(conn)?)
    }
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn create_entry(
        &self,
        entry: &NewCreditEntry,
        at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerRepositoryError> {
        let created_at = at.naive_utc();
        let customer_name = entry.customer_name().to_owned();
        let phone_number = entry.phone_number().map(str::to_owned);
        let estimated_payment_date = entry.estimated_payment_date();
        let item = NewItemValues::try_new(entry.first_item(), at)?;

        self.run(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let entry_row = diesel::insert_into(credit_entries::table)
                    .values(&NewCreditEntryRow {
                        customer_name: &customer_name,
                        phone_number: phone_number.as_deref(),
                        estimated_payment_date,
                        status: PaymentStatus::Pending.as_str(),
                        created_at,
                    })
                    .returning(CreditEntryRow::as_returning())
                    .get_result(conn)?;
                let item_row = item.insert(conn, entry_row.id)?;
                Ok(LedgerRecord {
                    entry: row_to_entry(entry_row)?,
                    items: vec![row_to_item(item_row)?],
                })
            })
        })
        .await
    }

    async fn add_item(
        &self,
        entry_id: EntryId,
        item: &NewCreditItem,
        at: DateTime<Utc>,
    ) -> Result<Option<CreditItem>, LedgerRepositoryError> {
        let entry_id = entry_id.get();
        let values = NewItemValues::try_new(item, at)?;

        self.run(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let Some(entry_row) = find_entry_row(conn, entry_id)? else {
                    return Ok(None);
                };
                let item_row = values.insert(conn, entry_row.id)?;
                let reopened = stored_state(&entry_row)?.apply(LedgerEvent::ItemAdded, at);
                persist_state(conn, entry_row.id, reopened)?;
                Ok(Some(row_to_item(item_row)?))
            })
        })
        .await
    }

    async fn pay_item(
        &self,
        entry_id: EntryId,
        item_id: ItemId,
        at: DateTime<Utc>,
    ) -> Result<ItemPayment, LedgerRepositoryError> {
        let (entry_id, item_id) = (entry_id.get(), item_id.get());
        let pending = PaymentStatus::Pending.as_str();

        self.run(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let updated = diesel::update(
                    credit_items::table
                        .filter(credit_items::id.eq(item_id))
                        .filter(credit_items::entry_id.eq(entry_id))
                        .filter(credit_items::status.eq(pending)),
                )
                .set((
                    credit_items::status.eq(PaymentStatus::Paid.as_str()),
                    credit_items::paid_at.eq(Some(at.naive_utc())),
                ))
                .execute(conn)?;
                if updated == 0 {
                    return Ok(ItemPayment::NoMatch);
                }

                let remaining_items: i64 = credit_items::table
                    .filter(credit_items::entry_id.eq(entry_id))
                    .filter(credit_items::status.eq(pending))
                    .count()
                    .get_result(conn)?;
                let entry_row = find_entry_row(conn, entry_id)?
                    .ok_or_else(|| corrupt("item", item_id, "entry row missing"))?;
                let mut entry_state = stored_state(&entry_row)?;
                if remaining_items == 0 {
                    entry_state = entry_state.apply(LedgerEvent::OutstandingCleared, at);
                    persist_state(conn, entry_id, entry_state)?;
                }
                Ok(ItemPayment::Paid {
                    entry_state,
                    remaining_items,
                })
            })
        })
        .await
    }

    async fn pay_entry(
        &self,
        entry_id: EntryId,
        at: DateTime<Utc>,
    ) -> Result<Option<EntryState>, LedgerRepositoryError> {
        let entry_id = entry_id.get();
        self.run(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let Some(entry_row) = find_entry_row(conn, entry_id)? else {
                    return Ok(None);
                };
                let settled = stored_state(&entry_row)?.apply(LedgerEvent::SettledInFull, at);
                persist_state(conn, entry_id, settled)?;
                Ok(Some(settled))
            })
        })
        .await
    }

    async fn delete_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<CompactionReport>, LedgerRepositoryError> {
        let entry_id = entry_id.get();
        self.run(move |conn| {
            conn.immediate_transaction::<_, StoreError, _>(|conn| {
                if find_entry_row(conn, entry_id)?.is_none() {
                    return Ok(None);
                }
                diesel::delete(credit_items::table.filter(credit_items::entry_id.eq(entry_id)))
                    .execute(conn)?;
                diesel::delete(credit_entries::table.find(entry_id)).execute(conn)?;
                let counts = compact_identifiers(conn)?;
                Ok(Some(CompactionReport {
                    surviving_entries: counts.entries,
                    surviving_items: counts.items,
                }))
            })
        })
        .await
    }

    async fn load_ledger(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<LedgerRecord>, LedgerRepositoryError> {
        let filter = filter.clone();
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                let mut entries: Vec<CreditEntryRow> = credit_entries::table
                    .select(CreditEntryRow::as_select())
                    .order((credit_entries::created_at.desc(), credit_entries::id.desc()))
                    .load(conn)?;
                let items = match filter.customer_query() {
                    Some(_) => {
                        entries.retain(|row| filter.matches_name(&row.customer_name));
                        let ids: Vec<i32> = entries.iter().map(|row| row.id).collect();
                        load_items(conn, Some(&ids))?
                    }
                    None => load_items(conn, None)?,
                };
                assemble(entries, items)
            })
        })
        .await
    }

    async fn find_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<LedgerRecord>, LedgerRepositoryError> {
        let entry_id = entry_id.get();
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                let Some(entry_row) = find_entry_row(conn, entry_id)? else {
                    return Ok(None);
                };
                let items = load_items(conn, Some(std::slice::from_ref(&entry_id)))?;
                Ok(assemble(vec![entry_row], items)?.pop())
            })
        })
        .await
    }
}
