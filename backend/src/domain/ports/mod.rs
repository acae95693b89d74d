//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod ledger_command;
mod ledger_query;
mod ledger_repository;
mod login_service;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{AddItemRequest, LedgerCommand, PayItemRequest};
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::{LedgerListing, LedgerQuery};
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerRecord, LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
