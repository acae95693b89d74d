//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{MockLedgerCommand, MockLedgerQuery, MockLoginService};
use crate::inbound::http::state::{HttpState, HttpStatePorts, ReportSettings};

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation, names the cookie `session` and drops the
/// `Secure` flag so plain HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Handler state over mocked driving ports.
pub fn mock_state(
    login: MockLoginService,
    ledger: MockLedgerCommand,
    ledger_query: MockLedgerQuery,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        ledger: Arc::new(ledger),
        ledger_query: Arc::new(ledger_query),
        report: ReportSettings::new("Tindahan ni Annie"),
    })
}
