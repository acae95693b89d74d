//! OpenAPI documentation for the ledger REST API.
//!
//! The generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::credits_dto::{
    AddEntryBody, AddItemBody, CompactionResponse, CreditEntryResponse, CreditItemResponse,
    EntryDetailResponse, EntrySummaryResponse, LedgerListingResponse, LedgerTotalsResponse,
    PayItemResponse,
};
use crate::inbound::http::users::LoginRequest;

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Utang ledger API",
        description = "Store credit ledger: customers, items bought on credit, and payments.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::credits::list_credits,
        crate::inbound::http::credits::credit_totals,
        crate::inbound::http::credits::add_credit,
        crate::inbound::http::credits::view_credit,
        crate::inbound::http::credits::add_credit_item,
        crate::inbound::http::credits::pay_credit_item,
        crate::inbound::http::credits::pay_credit,
        crate::inbound::http::credits::delete_credit,
        crate::inbound::http::export::export_credits,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        AddEntryBody,
        AddItemBody,
        CreditEntryResponse,
        CreditItemResponse,
        EntrySummaryResponse,
        EntryDetailResponse,
        LedgerTotalsResponse,
        LedgerListingResponse,
        PayItemResponse,
        CompactionResponse,
    )),
    tags(
        (name = "session", description = "Operator sign-in"),
        (name = "credits", description = "Credit entries, items, and payments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
