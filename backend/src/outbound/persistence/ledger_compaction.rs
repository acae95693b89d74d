//! Dense renumbering of ledger identifiers after an entry is deleted.
//!
//! Surviving rows are copied into shadow tables with fresh identifiers, the
//! live tables are dropped, and the shadows are renamed into place. Callers
//! must run this inside an immediate transaction: SQLite DDL is
//! transactional, so any failure leaves the original tables untouched.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::schema::{credit_entries, credit_items};

const CREATE_SHADOW_TABLES: &str = "
CREATE TABLE credit_entries_shadow (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    customer_name TEXT NOT NULL CHECK (length(trim(customer_name)) > 0),
    phone_number TEXT,
    estimated_payment_date DATE NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid')),
    created_at TIMESTAMP NOT NULL,
    paid_at TIMESTAMP
);
CREATE TABLE credit_items_shadow (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    entry_id INTEGER NOT NULL REFERENCES credit_entries_shadow (id) ON DELETE CASCADE,
    product TEXT NOT NULL CHECK (length(trim(product)) > 0),
    cost BIGINT NOT NULL CHECK (cost >= 0),
    quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity >= 1),
    unit_price BIGINT NOT NULL DEFAULT 0 CHECK (unit_price >= 0),
    added_at TIMESTAMP NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid')),
    paid_at TIMESTAMP
);
";

// Entries are numbered by creation order; items follow their entry's new
// number and keep their relative order within it.
const COPY_SURVIVORS: &str = "
INSERT INTO credit_entries_shadow
    (id, customer_name, phone_number, estimated_payment_date, status, created_at, paid_at)
SELECT ROW_NUMBER() OVER (ORDER BY created_at, id),
       customer_name, phone_number, estimated_payment_date, status, created_at, paid_at
FROM credit_entries;

INSERT INTO credit_items_shadow
    (id, entry_id, product, cost, quantity, unit_price, added_at, status, paid_at)
SELECT ROW_NUMBER() OVER (ORDER BY renumbered.new_id, item.id),
       renumbered.new_id, item.product, item.cost, item.quantity, item.unit_price,
       item.added_at, item.status, item.paid_at
FROM credit_items AS item
JOIN (
    SELECT id AS old_id, ROW_NUMBER() OVER (ORDER BY created_at, id) AS new_id
    FROM credit_entries
) AS renumbered ON renumbered.old_id = item.entry_id;
";

const SWAP_TABLES: &str = "
DROP TABLE credit_items;
DROP TABLE credit_entries;
ALTER TABLE credit_entries_shadow RENAME TO credit_entries;
ALTER TABLE credit_items_shadow RENAME TO credit_items;
CREATE INDEX idx_customer_name ON credit_entries (customer_name);
CREATE INDEX idx_status ON credit_entries (status);
CREATE INDEX idx_payment_date ON credit_entries (estimated_payment_date);
CREATE INDEX idx_credit_items_entry ON credit_items (entry_id);
";

const RESET_SEQUENCES: &str = "
DELETE FROM sqlite_sequence
WHERE name IN ('credit_entries', 'credit_items', 'credit_entries_shadow', 'credit_items_shadow');
INSERT INTO sqlite_sequence (name, seq) SELECT 'credit_entries', COUNT(*) FROM credit_entries;
INSERT INTO sqlite_sequence (name, seq) SELECT 'credit_items', COUNT(*) FROM credit_items;
";

/// Row counts left after compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompactedCounts {
    pub entries: i64,
    pub items: i64,
}

/// Renumber entries to `1..=N` and items to `1..=M`.
pub(crate) fn compact_identifiers(conn: &mut SqliteConnection) -> QueryResult<CompactedCounts> {
    conn.batch_execute(CREATE_SHADOW_TABLES)?;
    conn.batch_execute(COPY_SURVIVORS)?;
    conn.batch_execute(SWAP_TABLES)?;
    conn.batch_execute(RESET_SEQUENCES)?;

    let entries = credit_entries::table.count().get_result(conn)?;
    let items = credit_items::table.count().get_result(conn)?;
    Ok(CompactedCounts { entries, items })
}
