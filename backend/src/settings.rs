//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file, or
//! `UTANG_*` environment variables; anything omitted falls back to a local
//! development default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::StoredPassword;

const DEFAULT_DATABASE_PATH: &str = "utang.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_STORE_NAME: &str = "Tindahan";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host {value:?}")]
    InvalidHost { value: String },
    #[error("UTANG_LOGIN_PASSWORD_HASH must be an Argon2 PHC string")]
    InvalidPasswordHash,
    #[error("UTANG_LOGIN_USERNAME and UTANG_LOGIN_PASSWORD_HASH must be set together")]
    IncompleteCredential,
    #[error("pool size must be at least 1")]
    EmptyPool,
}

/// Runtime settings for the ledger server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "UTANG")]
pub struct AppSettings {
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Address to listen on.
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// Operator allowed to sign in.
    pub login_username: Option<String>,
    /// Argon2 PHC string of the operator password.
    pub login_password_hash: Option<String>,
    /// Store name printed on exported reports.
    pub store_name: Option<String>,
}

impl AppSettings {
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref().map(str::trim) {
            None | Some("") => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(raw) => raw.parse().map_err(|_| SettingsError::InvalidHost {
                value: raw.to_owned(),
            })?,
        };
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn pool_size(&self) -> Result<u32, SettingsError> {
        match self.pool_size {
            Some(0) => Err(SettingsError::EmptyPool),
            Some(size) => Ok(size),
            None => Ok(DEFAULT_POOL_SIZE),
        }
    }

    pub fn store_name(&self) -> &str {
        self.store_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_STORE_NAME)
    }

    /// The configured operator account, if any.
    ///
    /// Both halves must be present; a lone username or hash is a
    /// configuration mistake rather than an open door.
    pub fn operator_account(&self) -> Result<Option<(String, StoredPassword)>, SettingsError> {
        let username = self
            .login_username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        match (username, self.login_password_hash.as_deref()) {
            (None, None) => Ok(None),
            (Some(username), Some(raw)) => {
                let password =
                    StoredPassword::parse(raw).ok_or(SettingsError::InvalidPasswordHash)?;
                Ok(Some((username.to_owned(), password)))
            }
            _ => Err(SettingsError::IncompleteCredential),
        }
    }
}
