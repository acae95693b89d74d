//! Operator credentials supplied through configuration.

use async_trait::async_trait;

use crate::domain::StoredPassword;
use crate::domain::ports::{CredentialStore, CredentialStoreError};

/// Single shared operator account read from settings.
///
/// A store built without an account rejects every lookup as unavailable, so
/// a server started without credentials cannot be signed into.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCredentialStore {
    account: Option<(String, StoredPassword)>,
}

impl ConfiguredCredentialStore {
    pub fn new(username: impl Into<String>, password: StoredPassword) -> Self {
        Self {
            account: Some((username.into(), password)),
        }
    }

    /// Store with no operator configured.
    pub fn unconfigured() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for ConfiguredCredentialStore {
    async fn stored_password(
        &self,
        username: &str,
    ) -> Result<Option<StoredPassword>, CredentialStoreError> {
        let (configured, password) = self
            .account
            .as_ref()
            .ok_or_else(|| CredentialStoreError::unavailable("no operator credential configured"))?;
        Ok((configured == username).then(|| password.clone()))
    }
}
