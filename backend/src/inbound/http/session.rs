//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Handlers only persist, read, or forget the signed-in [`Operator`]; the
//! cookie format stays an adapter detail.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Operator};

pub(crate) const OPERATOR_KEY: &str = "operator";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in operator and rotate the session identifier.
    pub fn persist_operator(&self, operator: &Operator) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(OPERATOR_KEY, operator)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in operator, if any.
    ///
    /// A cookie holding something other than an operator name is treated as
    /// signed out.
    pub fn operator(&self) -> Result<Option<Operator>, Error> {
        match self.0.get::<String>(OPERATOR_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => Ok(Some(Operator::new(raw))),
            Ok(_) => Ok(None),
            Err(error) => {
                tracing::warn!(%error, "unreadable operator in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in operator or return `401 Unauthorized`.
    pub fn require_operator(&self) -> Result<Operator, Error> {
        self.operator()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
