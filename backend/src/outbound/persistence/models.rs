//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use super::schema::{credit_entries, credit_items};

/// Row struct for reading from the credit_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credit_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CreditEntryRow {
    pub id: i32,
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub estimated_payment_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

/// Insertable struct for opening a new entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_entries)]
pub(crate) struct NewCreditEntryRow<'a> {
    pub customer_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub estimated_payment_date: NaiveDate,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
}

/// Changeset applied when an entry's status moves.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = credit_entries)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EntryStateUpdate<'a> {
    pub status: &'a str,
    pub paid_at: Option<NaiveDateTime>,
}

/// Row struct for reading from the credit_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credit_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CreditItemRow {
    pub id: i32,
    pub entry_id: i32,
    pub product: String,
    pub cost: i64,
    pub quantity: i32,
    pub unit_price: i64,
    pub added_at: NaiveDateTime,
    pub status: String,
    pub paid_at: Option<NaiveDateTime>,
}

/// Insertable struct for charging an item to an entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_items)]
pub(crate) struct NewCreditItemRow<'a> {
    pub entry_id: i32,
    pub product: &'a str,
    pub cost: i64,
    pub quantity: i32,
    pub unit_price: i64,
    pub added_at: NaiveDateTime,
    pub status: &'a str,
}
