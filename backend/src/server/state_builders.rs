//! Builders wiring adapters into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use utang::domain::{CredentialLoginService, LedgerService};
use utang::inbound::http::state::{HttpState, HttpStatePorts, ReportSettings};
use utang::outbound::credentials::ConfiguredCredentialStore;
use utang::outbound::persistence::DieselLedgerRepository;

use super::ServerConfig;

fn build_credential_store(config: &ServerConfig) -> ConfiguredCredentialStore {
    match &config.operator {
        Some((username, password)) => {
            ConfiguredCredentialStore::new(username.clone(), password.clone())
        }
        None => {
            warn!("no operator credential configured; logins will be refused");
            ConfiguredCredentialStore::unconfigured()
        }
    }
}

/// Build the shared handler state from configuration.
///
/// One `LedgerService` backs both the command and query ports.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository = Arc::new(DieselLedgerRepository::new(config.db_pool.clone()));
    let ledger = Arc::new(LedgerService::new(repository, Arc::new(DefaultClock)));
    let login = CredentialLoginService::new(Arc::new(build_credential_store(config)));

    web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(login),
        ledger: ledger.clone(),
        ledger_query: ledger,
        report: ReportSettings::new(config.store_name.clone()),
    }))
}
