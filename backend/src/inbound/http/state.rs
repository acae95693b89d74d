//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LedgerCommand, LedgerQuery, LoginService};

/// Presentation settings for the exported report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub store_name: String,
}

impl ReportSettings {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
        }
    }
}

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
    pub report: ReportSettings,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
    pub report: ReportSettings,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use utang::domain::{CredentialLoginService, LedgerService};
    /// use utang::inbound::http::state::{HttpState, HttpStatePorts, ReportSettings};
    /// use utang::outbound::credentials::ConfiguredCredentialStore;
    /// use utang::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};
    ///
    /// let pool = DbPool::new(PoolConfig::new("utang.db")).expect("pool");
    /// let ledger = Arc::new(LedgerService::new(
    ///     Arc::new(DieselLedgerRepository::new(pool)),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let login = CredentialLoginService::new(Arc::new(ConfiguredCredentialStore::unconfigured()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(login),
    ///     ledger: ledger.clone(),
    ///     ledger_query: ledger,
    ///     report: ReportSettings::new("Tindahan ni Annie"),
    /// });
    /// let _ledger = state.ledger.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            ledger,
            ledger_query,
            report,
        } = ports;
        Self {
            login,
            ledger,
            ledger_query,
            report,
        }
    }
}
