//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `backend/migrations` and the shadow tables
//! rebuilt by identifier compaction.

diesel::table! {
    /// One customer's credit record.
    credit_entries (id) {
        id -> Integer,
        customer_name -> Text,
        phone_number -> Nullable<Text>,
        estimated_payment_date -> Date,
        /// `pending` or `paid`.
        status -> Text,
        created_at -> Timestamp,
        paid_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// Products charged to an entry. Money columns hold centavos.
    credit_items (id) {
        id -> Integer,
        entry_id -> Integer,
        product -> Text,
        cost -> BigInt,
        quantity -> Integer,
        unit_price -> BigInt,
        added_at -> Timestamp,
        status -> Text,
        paid_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(credit_items -> credit_entries (entry_id));
diesel::allow_tables_to_appear_in_same_query!(credit_entries, credit_items);
