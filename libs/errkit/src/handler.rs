//! Axum boundary adapter.
//!
//! This module sits at the single point where request handling surfaces an
//! error and a response must be emitted: it classifies the error, resolves
//! it to an [`ErrorRecord`], stamps the request's correlation id, redacts
//! the location outside development environments, and writes the record as
//! the JSON response body.

use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::{HeaderMap, StatusCode};

use crate::builder::{Builder, ErrorSource};
use crate::record::{ErrorRecord, reason_phrase};

/// Request header carrying the correlation identifier.
pub const CORRELATION_ID_HEADER: &str = "x-request-id";

/// Environment variable consulted before including location details in a
/// response.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

const DEV_ENVIRONMENT: &str = "dev";

/// Boundary classification of an error surfaced by request handling.
///
/// The three cases are mutually exclusive and every one resolves to a valid
/// record: no path can fail to produce a response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Already a structured record; reused as-is apart from the correlation
    /// id, which is overwritten from the request.
    #[error(transparent)]
    Record(ErrorRecord),
    /// A framework-native HTTP error carrying its own status code and,
    /// possibly, a message.
    #[error("{status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    /// Anything else. Responds with status 500 and the error text as the
    /// message; the underlying error is retained on the record.
    #[error(transparent)]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    /// Classify an arbitrary typed error as [`ApiError::Other`].
    #[must_use]
    pub fn from_err(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }

    /// Resolve the classification into a record stamped with
    /// `correlation_id`.
    #[must_use]
    pub fn into_record(self, correlation_id: &str) -> ErrorRecord {
        match self {
            Self::Record(mut record) => {
                record.correlation_id = correlation_id.to_owned();
                record
            }
            Self::Status { status, message } => {
                let message =
                    message.unwrap_or_else(|| reason_phrase(status.as_u16()).to_owned());
                Builder::new()
                    .status_code(status.as_u16())
                    .message(message)
                    .correlation_id(correlation_id)
                    .build(Utc::now())
            }
            Self::Other(err) => Builder::new()
                .status_code(500)
                .from_error(ErrorSource::Typed(err))
                .correlation_id(correlation_id)
                .build(Utc::now()),
        }
    }
}

impl From<ErrorRecord> for ApiError {
    fn from(record: ErrorRecord) -> Self {
        Self::Record(record)
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self::Status {
            status,
            message: None,
        }
    }
}

impl From<(StatusCode, String)> for ApiError {
    fn from((status, message): (StatusCode, String)) -> Self {
        Self::Status {
            status,
            message: Some(message),
        }
    }
}

impl From<(StatusCode, &str)> for ApiError {
    fn from((status, message): (StatusCode, &str)) -> Self {
        Self::Status {
            status,
            message: Some(message.to_owned()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err: Box<dyn std::error::Error + Send + Sync> = err.into();
        Self::Other(Arc::from(err))
    }
}

/// Extract the correlation id from the request headers.
#[must_use]
pub fn correlation_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

/// True when `value` names the development environment.
fn is_dev(value: Option<&str>) -> bool {
    value == Some(DEV_ENVIRONMENT)
}

/// Read the environment flag. Consulted fresh on every response so a
/// process never caches the answer.
#[must_use]
pub fn is_dev_env() -> bool {
    is_dev(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
}

/// Resolve `err` to a record and serialize it, with the record's status as
/// the response status. Location details are dropped unless
/// `include_location` is set.
pub fn render_error(err: ApiError, correlation_id: &str, include_location: bool) -> Response {
    let mut record = err.into_record(correlation_id);
    if !include_location {
        record.redact_location();
    }
    let status =
        StatusCode::from_u16(record.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Json(&record).into_response();
    *response.status_mut() = status;
    response
}

/// Classify `err` and emit the JSON error response for a request carrying
/// `headers`.
pub fn error_response(err: impl Into<ApiError>, headers: &HeaderMap) -> Response {
    let err = err.into();
    log_boundary_error(&err);
    render_error(
        err,
        correlation_id_from(headers).unwrap_or_default().as_str(),
        is_dev_env(),
    )
}

fn log_boundary_error(err: &ApiError) {
    if let ApiError::Other(source) = err {
        tracing::error!(error = %source, "unhandled error reached the response boundary");
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_boundary_error(&self);
        let mut response = render_error(self.clone(), "", is_dev_env());
        // Keep the classification around so error_adapter_middleware can
        // rebuild the response with the request's correlation header.
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for ErrorRecord {
    fn into_response(self) -> Response {
        ApiError::Record(self).into_response()
    }
}

/// Boundary middleware: rebuilds error responses produced from [`ApiError`]
/// (or [`ErrorRecord`]) values so their correlation id reflects the
/// request's `x-request-id` header.
pub async fn error_adapter_middleware(request: Request, next: Next) -> Response {
    let correlation_id = correlation_id_from(request.headers()).unwrap_or_default();
    let mut response = next.run(request).await;
    if response.status().is_success() {
        return response;
    }
    match response.extensions_mut().remove::<ApiError>() {
        Some(err) => render_error(err, &correlation_id, is_dev_env()),
        None => response,
    }
}
