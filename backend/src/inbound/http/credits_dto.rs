//! Request and response payloads for the credit ledger endpoints.
//!
//! Amounts travel as decimal strings with two places (`"250.00"`) so clients
//! never round through floating point. Requests accept either strings or
//! JSON numbers for amounts and quantities.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::LedgerListing;
use crate::domain::{
    CompactionReport, CreditEntry, CreditEntryInput, CreditItem, CreditItemInput, EntryDetail,
    EntryState, EntrySummary, ItemPayment, LedgerTotals,
};

/// Amount or count supplied as a string or a bare JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Text(String),
    Number(serde_json::Number),
}

impl NumberOrText {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Item fields for `POST /api/v1/credits/{id}/items`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    #[schema(example = "Sardines")]
    pub product: String,
    #[schema(value_type = String, example = "45.50")]
    pub cost: NumberOrText,
    #[schema(value_type = Option<String>, example = "1")]
    pub quantity: Option<NumberOrText>,
    #[schema(value_type = Option<String>, example = "45.50")]
    pub unit_price: Option<NumberOrText>,
}

impl From<AddItemBody> for CreditItemInput {
    fn from(body: AddItemBody) -> Self {
        Self {
            product: body.product,
            cost: body.cost.into_text(),
            quantity: body.quantity.map(NumberOrText::into_text),
            unit_price: body.unit_price.map(NumberOrText::into_text),
        }
    }
}

/// Entry fields for `POST /api/v1/credits`, including the first item.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryBody {
    #[schema(example = "Ana")]
    pub customer_name: String,
    pub phone_number: Option<String>,
    #[schema(example = "2025-02-15")]
    pub estimated_payment_date: String,
    #[serde(flatten)]
    pub first_item: AddItemBody,
}

impl From<AddEntryBody> for CreditEntryInput {
    fn from(body: AddEntryBody) -> Self {
        Self {
            customer_name: body.customer_name,
            phone_number: body.phone_number,
            estimated_payment_date: body.estimated_payment_date,
            first_item: body.first_item.into(),
        }
    }
}

/// Search parameters for listing and totals.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive fragment of the customer name.
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditItemResponse {
    pub id: i32,
    pub entry_id: i32,
    pub product: String,
    #[schema(example = "250.00")]
    pub cost: String,
    pub quantity: i32,
    #[schema(example = "0.00")]
    pub unit_price: String,
    pub added_at: String,
    #[schema(example = "pending")]
    pub status: String,
    pub paid_at: Option<String>,
}

impl From<CreditItem> for CreditItemResponse {
    fn from(item: CreditItem) -> Self {
        Self {
            id: item.id.get(),
            entry_id: item.entry_id.get(),
            product: item.product,
            cost: item.cost.to_string(),
            quantity: item.quantity.get(),
            unit_price: item.unit_price.to_string(),
            added_at: item.added_at.to_rfc3339(),
            status: item.status.as_str().to_owned(),
            paid_at: item.paid_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditEntryResponse {
    pub id: i32,
    pub customer_name: String,
    pub phone_number: Option<String>,
    #[schema(example = "2025-02-15")]
    pub estimated_payment_date: String,
    #[schema(example = "pending")]
    pub status: String,
    pub paid_at: Option<String>,
    pub created_at: String,
}

impl From<CreditEntry> for CreditEntryResponse {
    fn from(entry: CreditEntry) -> Self {
        Self {
            id: entry.id.get(),
            customer_name: entry.customer_name,
            phone_number: entry.phone_number,
            estimated_payment_date: entry.estimated_payment_date.to_string(),
            status: entry.state.status().as_str().to_owned(),
            paid_at: entry.state.paid_at().map(|at| at.to_rfc3339()),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

fn item_responses(items: Vec<CreditItem>) -> Vec<CreditItemResponse> {
    items.into_iter().map(CreditItemResponse::from).collect()
}

/// Entry with its outstanding balance and pending items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummaryResponse {
    pub entry: CreditEntryResponse,
    #[schema(example = "350.00")]
    pub total_cost: String,
    pub item_count: usize,
    pub items: Vec<CreditItemResponse>,
}

impl From<EntrySummary> for EntrySummaryResponse {
    fn from(summary: EntrySummary) -> Self {
        Self {
            entry: summary.entry.into(),
            total_cost: summary.total_cost.to_string(),
            item_count: summary.item_count,
            items: item_responses(summary.items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotalsResponse {
    pub entry_count: usize,
    pub pending: String,
    pub paid: String,
    pub all: String,
}

impl From<LedgerTotals> for LedgerTotalsResponse {
    fn from(totals: LedgerTotals) -> Self {
        Self {
            entry_count: totals.entry_count,
            pending: totals.pending.to_string(),
            paid: totals.paid.to_string(),
            all: totals.all.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerListingResponse {
    pub entries: Vec<EntrySummaryResponse>,
    pub totals: LedgerTotalsResponse,
}

impl From<LedgerListing> for LedgerListingResponse {
    fn from(listing: LedgerListing) -> Self {
        Self {
            entries: listing
                .entries
                .into_iter()
                .map(EntrySummaryResponse::from)
                .collect(),
            totals: listing.totals.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailResponse {
    pub entry: CreditEntryResponse,
    pub items: Vec<CreditItemResponse>,
    pub paid_items: Vec<CreditItemResponse>,
    #[schema(example = "250.00")]
    pub total: String,
}

impl From<EntryDetail> for EntryDetailResponse {
    fn from(detail: EntryDetail) -> Self {
        Self {
            entry: detail.entry.into(),
            items: item_responses(detail.items),
            paid_items: item_responses(detail.paid_items),
            total: detail.total.to_string(),
        }
    }
}

/// Outcome of paying one item.
///
/// `settled` is false when no pending item matched; the entry fields are
/// omitted then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayItemResponse {
    pub settled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "paid")]
    pub entry_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_items: Option<i64>,
}

impl From<ItemPayment> for PayItemResponse {
    fn from(outcome: ItemPayment) -> Self {
        match outcome {
            ItemPayment::NoMatch => Self {
                settled: false,
                entry_status: None,
                remaining_items: None,
            },
            ItemPayment::Paid {
                entry_state,
                remaining_items,
            } => Self {
                settled: true,
                entry_status: Some(status_text(entry_state)),
                remaining_items: Some(remaining_items),
            },
        }
    }
}

fn status_text(state: EntryState) -> String {
    state.status().as_str().to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompactionResponse {
    pub surviving_entries: i64,
    pub surviving_items: i64,
}

impl From<CompactionReport> for CompactionResponse {
    fn from(report: CompactionReport) -> Self {
        Self {
            surviving_entries: report.surviving_entries,
            surviving_items: report.surviving_items,
        }
    }
}
