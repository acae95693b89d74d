//! Driving port for operator sign-in.
//!
//! Inbound adapters call it to authenticate credentials without knowing where
//! accounts are kept, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Operator};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in operator.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Operator, Error>;
}
