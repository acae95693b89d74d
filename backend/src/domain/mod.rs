//! Domain primitives, ports, and services.
//!
//! Purpose: define the credit ledger's strongly typed entities and the
//! services that enforce its consistency rules, independent of HTTP and
//! storage. Adapters talk to the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: per-request correlation identifier.
//! - ledger types: entries, items, money, status machine and read models.
//! - LoginCredentials / Operator: authentication primitives.
//! - LedgerService / CredentialLoginService: driving port implementations.

pub mod auth;
pub mod error;
pub mod ledger;
mod ledger_service;
mod login_service;
pub mod ports;
pub mod trace_id;

pub use self::auth::{LoginCredentials, LoginValidationError, Operator, StoredPassword};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger::{
    CompactionReport, CreditEntry, CreditEntryInput, CreditItem, CreditItemInput, EntryDetail,
    EntryFilter, EntryId, EntryState, EntrySummary, ItemId, ItemPayment, LedgerEvent,
    LedgerSnapshot, LedgerTotals, LedgerValidationError, Money, MoneyError, NewCreditEntry,
    NewCreditItem, ParsePaymentStatusError, PaymentStatus, Quantity,
};
pub use self::ledger_service::LedgerService;
pub use self::login_service::CredentialLoginService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use utang::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
