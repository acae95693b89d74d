//! Read models derived from stored entries and items.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CreditEntry, CreditItem, EntryState, Money};

/// Selects which entries a listing covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    customer_query: Option<String>,
}

impl EntryFilter {
    /// Every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Entries whose customer name contains `query`, ignoring case.
    ///
    /// A blank query selects every entry.
    pub fn customer(query: &str) -> Self {
        let trimmed = query.trim();
        Self {
            customer_query: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    /// Normalised search text, if any.
    pub fn customer_query(&self) -> Option<&str> {
        self.customer_query.as_deref()
    }

    /// Whether `entry` is selected.
    ///
    /// # Examples
    /// ```
    /// use utang::domain::EntryFilter;
    ///
    /// let filter = EntryFilter::customer("an");
    /// assert!(filter.matches_name("Ana"));
    /// assert!(!filter.matches_name("Bert"));
    /// ```
    pub fn matches_name(&self, customer_name: &str) -> bool {
        match &self.customer_query {
            Some(query) => customer_name.to_lowercase().contains(query.as_str()),
            None => true,
        }
    }
}

fn newest_first(items: &mut [CreditItem]) {
    items.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
}

/// Entry annotated with its outstanding balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub entry: CreditEntry,
    pub total_cost: Money,
    pub item_count: usize,
    /// Outstanding items, newest first.
    pub items: Vec<CreditItem>,
}

impl EntrySummary {
    /// Summarise `entry` from all of its stored items.
    ///
    /// Paid items are dropped; the total and count cover what is still owed.
    pub fn from_items(entry: CreditEntry, items: Vec<CreditItem>) -> Self {
        let mut outstanding: Vec<CreditItem> =
            items.into_iter().filter(CreditItem::is_outstanding).collect();
        newest_first(&mut outstanding);
        Self {
            entry,
            total_cost: outstanding.iter().map(|item| item.cost).sum(),
            item_count: outstanding.len(),
            items: outstanding,
        }
    }
}

/// Single entry with its outstanding and settled items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetail {
    pub entry: CreditEntry,
    /// Outstanding items, newest first.
    pub items: Vec<CreditItem>,
    /// Items already paid, most recently paid first.
    pub paid_items: Vec<CreditItem>,
    pub total: Money,
}

impl EntryDetail {
    /// Split `items` into outstanding and paid groups.
    pub fn from_items(entry: CreditEntry, items: Vec<CreditItem>) -> Self {
        let (mut outstanding, mut paid): (Vec<_>, Vec<_>) =
            items.into_iter().partition(CreditItem::is_outstanding);
        newest_first(&mut outstanding);
        paid.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));
        Self {
            total: outstanding.iter().map(|item| item.cost).sum(),
            entry,
            items: outstanding,
            paid_items: paid,
        }
    }
}

/// Ledger-wide sums.
///
/// An item counts as paid when it was paid individually or when its entry
/// was settled in full; otherwise it is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub entry_count: usize,
    pub pending: Money,
    pub paid: Money,
    pub all: Money,
}

impl LedgerTotals {
    /// Accumulate totals over entries and their stored items.
    pub fn tally<'a, I>(ledger: I) -> Self
    where
        I: IntoIterator<Item = (&'a CreditEntry, &'a [CreditItem])>,
    {
        let mut totals = Self::default();
        for (entry, items) in ledger {
            totals.entry_count += 1;
            for item in items {
                if item.is_outstanding() && !entry.state.is_paid() {
                    totals.pending = totals.pending + item.cost;
                } else {
                    totals.paid = totals.paid + item.cost;
                }
            }
        }
        totals.all = totals.pending + totals.paid;
        totals
    }
}

/// Read-only dump used for report generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Entries ordered by customer name, then newest first.
    pub entries: Vec<EntrySummary>,
    pub totals: LedgerTotals,
}

/// Outcome of paying a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPayment {
    /// No pending item matched the entry/item pair; nothing changed.
    NoMatch,
    /// The item was settled.
    Paid {
        entry_state: EntryState,
        remaining_items: i64,
    },
}

/// Result of deleting an entry and compacting identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactionReport {
    pub surviving_entries: i64,
    pub surviving_items: i64,
}
