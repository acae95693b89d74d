//! Payment status and the entry state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether an entry or item is still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    /// Stored and serialised representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status {value:?}")]
pub struct ParsePaymentStatusError {
    pub value: String,
}

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(ParsePaymentStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Events that move an entry between pending and paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A new item was charged to the entry.
    ItemAdded,
    /// The last outstanding item was paid.
    OutstandingCleared,
    /// The whole entry was settled at once, items untouched.
    SettledInFull,
}

/// Status of a ledger entry together with when it was paid.
///
/// ## Invariants
/// - `paid_at` is `Some` exactly when `status` is [`PaymentStatus::Paid`].
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use utang::domain::{EntryState, LedgerEvent, PaymentStatus};
///
/// let now = Utc::now();
/// let paid = EntryState::pending().apply(LedgerEvent::OutstandingCleared, now);
/// assert_eq!(paid.status(), PaymentStatus::Paid);
/// let reopened = paid.apply(LedgerEvent::ItemAdded, now);
/// assert_eq!(reopened, EntryState::pending());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryState {
    status: PaymentStatus,
    paid_at: Option<DateTime<Utc>>,
}

impl EntryState {
    /// State of a freshly created entry.
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            paid_at: None,
        }
    }

    /// Rebuild a state from stored columns.
    ///
    /// A paid row without a timestamp is kept paid with no timestamp rather
    /// than rejected; a pending row drops any stray timestamp.
    pub fn from_parts(status: PaymentStatus, paid_at: Option<DateTime<Utc>>) -> Self {
        match status {
            PaymentStatus::Pending => Self::pending(),
            PaymentStatus::Paid => Self { status, paid_at },
        }
    }

    /// Next state after `event` happens at `at`.
    ///
    /// Transitions do not depend on the current state: adding debt always
    /// reopens the entry and either kind of settlement re-stamps it.
    #[must_use]
    pub fn apply(self, event: LedgerEvent, at: DateTime<Utc>) -> Self {
        match event {
            LedgerEvent::ItemAdded => Self::pending(),
            LedgerEvent::OutstandingCleared | LedgerEvent::SettledInFull => Self {
                status: PaymentStatus::Paid,
                paid_at: Some(at),
            },
        }
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}
