//! Credit ledger HTTP handlers.
//!
//! ```text
//! GET    /api/v1/credits?q=an
//! GET    /api/v1/credits/totals?q=an
//! POST   /api/v1/credits
//! GET    /api/v1/credits/{id}
//! POST   /api/v1/credits/{id}/items
//! POST   /api/v1/credits/{id}/items/{itemId}/pay
//! POST   /api/v1/credits/{id}/pay
//! DELETE /api/v1/credits/{id}
//! ```
//!
//! Every handler requires a signed-in operator. Identifiers in the path must
//! be positive; anything else is rejected before the ledger is touched.

use actix_web::{HttpResponse, delete, get, http::header, post, web};
use tracing::debug;

use crate::domain::ports::{AddItemRequest, PayItemRequest};
use crate::domain::{EntryId, Error, ItemId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::credits_dto::{
    AddEntryBody, AddItemBody, CompactionResponse, CreditItemResponse, EntryDetailResponse,
    LedgerListingResponse, LedgerTotalsResponse, PayItemResponse, SearchParams,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn search_text(params: &SearchParams) -> Option<&str> {
    params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty())
}

/// List entries, optionally narrowed by customer name, with totals.
#[utoipa::path(
    get,
    path = "/api/v1/credits",
    params(SearchParams),
    responses(
        (status = 200, description = "Entries, newest first, with totals", body = LedgerListingResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Ledger unavailable", body = Error)
    ),
    tags = ["credits"],
    operation_id = "listCredits"
)]
#[get("/credits")]
pub async fn list_credits(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<LedgerListingResponse>> {
    session.require_operator()?;
    let listing = match search_text(&params) {
        Some(query) => state.ledger_query.search_entries(query).await?,
        None => state.ledger_query.list_entries().await?,
    };
    Ok(web::Json(listing.into()))
}

/// Pending, paid, and overall sums, optionally narrowed by customer name.
#[utoipa::path(
    get,
    path = "/api/v1/credits/totals",
    params(SearchParams),
    responses(
        (status = 200, description = "Ledger totals", body = LedgerTotalsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["credits"],
    operation_id = "creditTotals"
)]
#[get("/credits/totals")]
pub async fn credit_totals(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<LedgerTotalsResponse>> {
    session.require_operator()?;
    let query = search_text(&params).map(str::to_owned);
    let totals = state.ledger_query.totals(query).await?;
    Ok(web::Json(totals.into()))
}

/// Open a credit entry for a customer with its first item.
#[utoipa::path(
    post,
    path = "/api/v1/credits",
    request_body = AddEntryBody,
    responses(
        (status = 201, description = "Entry created", body = EntryDetailResponse,
            headers(("Location" = String, description = "URL of the new entry"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["credits"],
    operation_id = "addCredit"
)]
#[post("/credits")]
pub async fn add_credit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddEntryBody>,
) -> ApiResult<HttpResponse> {
    let operator = session.require_operator()?;
    let detail = state.ledger.add_entry(payload.into_inner().into()).await?;
    debug!(operator = operator.as_str(), entry_id = %detail.entry.id, "entry added over http");
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/v1/credits/{}", detail.entry.id),
        ))
        .json(EntryDetailResponse::from(detail)))
}

/// Entry with pending and paid items.
#[utoipa::path(
    get,
    path = "/api/v1/credits/{id}",
    params(("id" = i32, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry detail", body = EntryDetailResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such entry", body = Error)
    ),
    tags = ["credits"],
    operation_id = "viewCredit"
)]
#[get("/credits/{id}")]
pub async fn view_credit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<EntryDetailResponse>> {
    session.require_operator()?;
    let entry_id = EntryId::new(path.into_inner())?;
    let detail = state.ledger_query.view_entry(entry_id).await?;
    Ok(web::Json(detail.into()))
}

/// Charge another item to an entry; a paid entry reopens.
#[utoipa::path(
    post,
    path = "/api/v1/credits/{id}/items",
    params(("id" = i32, Path, description = "Entry identifier")),
    request_body = AddItemBody,
    responses(
        (status = 201, description = "Item added", body = CreditItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such entry", body = Error)
    ),
    tags = ["credits"],
    operation_id = "addCreditItem"
)]
#[post("/credits/{id}/items")]
pub async fn add_credit_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<AddItemBody>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let entry_id = EntryId::new(path.into_inner())?;
    let item = state
        .ledger
        .add_item(AddItemRequest {
            entry_id,
            item: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(CreditItemResponse::from(item)))
}

/// Mark one pending item paid.
///
/// An unknown or already paid item is not an error: the response reports
/// `settled: false` and nothing changes.
#[utoipa::path(
    post,
    path = "/api/v1/credits/{id}/items/{itemId}/pay",
    params(
        ("id" = i32, Path, description = "Entry identifier"),
        ("itemId" = i32, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "Payment outcome", body = PayItemResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["credits"],
    operation_id = "payCreditItem"
)]
#[post("/credits/{id}/items/{item_id}/pay")]
pub async fn pay_credit_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
) -> ApiResult<web::Json<PayItemResponse>> {
    session.require_operator()?;
    let (raw_entry, raw_item) = path.into_inner();
    let request = PayItemRequest {
        entry_id: EntryId::new(raw_entry)?,
        item_id: ItemId::new(raw_item)?,
    };
    let outcome = state.ledger.pay_item(request).await?;
    Ok(web::Json(outcome.into()))
}

/// Settle an entry in full.
#[utoipa::path(
    post,
    path = "/api/v1/credits/{id}/pay",
    params(("id" = i32, Path, description = "Entry identifier")),
    responses(
        (status = 204, description = "Entry settled"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such entry", body = Error)
    ),
    tags = ["credits"],
    operation_id = "payCredit"
)]
#[post("/credits/{id}/pay")]
pub async fn pay_credit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let entry_id = EntryId::new(path.into_inner())?;
    state.ledger.pay_entry(entry_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an entry with its items and renumber the rest.
///
/// Identifiers held by clients are stale after this call.
#[utoipa::path(
    delete,
    path = "/api/v1/credits/{id}",
    params(("id" = i32, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry deleted and identifiers compacted", body = CompactionResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such entry", body = Error)
    ),
    tags = ["credits"],
    operation_id = "deleteCredit"
)]
#[delete("/credits/{id}")]
pub async fn delete_credit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<CompactionResponse>> {
    session.require_operator()?;
    let entry_id = EntryId::new(path.into_inner())?;
    let report = state.ledger.delete_entry(entry_id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
#[path = "credits_tests.rs"]
mod tests;
