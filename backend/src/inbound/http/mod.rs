//! HTTP inbound adapter exposing the ledger REST endpoints.

pub mod credits;
pub mod credits_dto;
pub mod error;
pub mod export;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;
use serde_json::json;

pub use error::ApiResult;

use crate::domain::Error;

fn malformed(kind: &'static str, detail: impl std::fmt::Display) -> actix_web::Error {
    Error::invalid_request(format!("malformed {kind}: {detail}"))
        .with_details(json!({ "code": format!("invalid_{kind}") }))
        .into()
}

/// Register the `/api/v1` handlers on `cfg`.
///
/// Fixed paths under `/credits` are registered ahead of `/credits/{id}` so
/// they are not captured as identifiers. Extractor failures are answered with
/// the same JSON error payload handlers use.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use utang::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| malformed("body", err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| malformed("path", err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| malformed("query", err)))
        .service(users::login)
        .service(users::logout)
        .service(credits::list_credits)
        .service(credits::credit_totals)
        .service(export::export_credits)
        .service(credits::add_credit)
        .service(credits::view_credit)
        .service(credits::add_credit_item)
        .service(credits::pay_credit_item)
        .service(credits::pay_credit)
        .service(credits::delete_credit);
}
