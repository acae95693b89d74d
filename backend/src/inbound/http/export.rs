//! Printable ledger download.
//!
//! ```text
//! GET /api/v1/credits/export
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::report::{render_report, report_filename};

/// Download every entry and the ledger totals as a text report.
#[utoipa::path(
    get,
    path = "/api/v1/credits/export",
    responses(
        (status = 200, description = "Text report attachment", content_type = "text/plain",
            body = String,
            headers(("Content-Disposition" = String, description = "Attachment filename"))),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Ledger unavailable", body = Error)
    ),
    tags = ["credits"],
    operation_id = "exportCredits"
)]
#[get("/credits/export")]
pub async fn export_credits(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let snapshot = state.ledger_query.export_snapshot().await?;
    let body = render_report(&snapshot, &state.report.store_name)
        .map_err(|_| Error::internal("failed to render ledger report"))?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(report_filename(
            snapshot.generated_at,
        ))],
    };
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(body))
}
