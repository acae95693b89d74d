//! Maps domain errors onto JSON HTTP responses.
//!
//! Every failure leaves a handler as the domain `Error` payload. Internal
//! errors are logged in full and answered with a fixed message so storage
//! details never reach the client.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing copy of `error`.
fn public_payload(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            error!(
                trace_id = error.trace_id().unwrap_or_default(),
                detail = error.message(),
                "request failed"
            );
            let redacted = Error::internal(REDACTED_MESSAGE);
            match error.trace_id() {
                Some(id) => redacted.with_trace_id(id.to_owned()),
                None => redacted,
            }
        }
        ErrorCode::ServiceUnavailable => {
            warn!(detail = error.message(), "ledger temporarily unavailable");
            error.clone()
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(public_payload(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}
