//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use utang::domain::StoredPassword;
use utang::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) operator: Option<(String, StoredPassword)>,
    pub(crate) store_name: String,
}

impl ServerConfig {
    /// Construct a server configuration around an opened database pool.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            operator: None,
            store_name: String::new(),
        }
    }

    /// Attach the operator account allowed to sign in.
    ///
    /// Without one every login attempt is answered with 503.
    #[must_use]
    pub fn with_operator(mut self, operator: Option<(String, StoredPassword)>) -> Self {
        self.operator = operator;
        self
    }

    /// Store name printed in exported reports.
    #[must_use]
    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }
}
