//! Driven port exposing stored operator accounts.

use async_trait::async_trait;

use crate::domain::StoredPassword;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading operator accounts.
    pub enum CredentialStoreError {
        /// The account source could not be read.
        Unavailable { message: String } =>
            "credential store unavailable: {message}",
    }
}

/// Lookup of stored password hashes by operator username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Hash stored for `username`, or `None` when no such operator exists.
    async fn stored_password(
        &self,
        username: &str,
    ) -> Result<Option<StoredPassword>, CredentialStoreError>;
}
