//! Structured error records for HTTP services
//!
//! This crate provides a serializable error record (status code, reason
//! phrase, message, machine-readable custom code, correlation id, tags, and
//! the source location where the error was raised) together with a builder
//! whose defaulting rules guarantee that assembling an error never fails.
//!
//! - [`ErrorRecord`] / [`ErrorLocation`]: the data model
//! - [`Builder`]: chainable assembly with an ordered build pipeline and
//!   late-binding [`options`]
//! - [`CallSite`] / [`callsite!`]: explicit compile-time location capture
//! - `handler` (behind the `axum` feature): the boundary adapter that
//!   classifies arbitrary errors and writes them as JSON responses,
//!   redacting location details outside development environments
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod code;
pub mod location;
pub mod options;
pub mod record;

#[cfg(feature = "axum")]
pub mod handler;

// Re-export commonly used types
pub use builder::{Builder, ErrorSource};
pub use code::CustomCode;
pub use location::CallSite;
pub use options::RecordOption;
pub use record::{DEFAULT_SOURCE, Domain, ErrorLocation, ErrorRecord, reason_phrase};

#[cfg(feature = "axum")]
pub use handler::{
    ApiError, CORRELATION_ID_HEADER, ENVIRONMENT_VAR, error_adapter_middleware, error_response,
};
