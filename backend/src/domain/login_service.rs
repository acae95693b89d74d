//! Operator sign-in against stored credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{CredentialStore, CredentialStoreError, LoginService};
use crate::domain::{Error, LoginCredentials, Operator};

/// Login service verifying passwords against a [`CredentialStore`].
///
/// Argon2 verification runs on the blocking pool.
#[derive(Clone)]
pub struct CredentialLoginService<S> {
    store: Arc<S>,
}

impl<S> CredentialLoginService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("credential store unavailable: {message}"))
        }
    }
}

#[async_trait]
impl<S> LoginService for CredentialLoginService<S>
where
    S: CredentialStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Operator, Error> {
        let stored = self
            .store
            .stored_password(credentials.username())
            .await
            .map_err(map_store_error)?;
        let verified = match stored {
            Some(stored) => {
                let supplied = credentials.clone();
                tokio::task::spawn_blocking(move || stored.verify(supplied.password()))
                    .await
                    .map_err(|err| {
                        error!(error = %err, "password verification task failed");
                        Error::internal("password verification failed")
                    })?
            }
            None => false,
        };
        if verified {
            info!(operator = credentials.username(), "operator signed in");
            Ok(Operator::new(credentials.username()))
        } else {
            debug!(operator = credentials.username(), "login rejected");
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
