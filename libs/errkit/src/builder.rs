//! Record assembly: chainable mutators and the ordered build pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::code::CustomCode;
use crate::location::CallSite;
use crate::options::RecordOption;
use crate::record::{DEFAULT_SOURCE, Domain, ErrorLocation, ErrorRecord, reason_phrase};

/// What [`Builder::from_error`] was given: a typed error or plain text.
///
/// Typed errors are retained on the record; plain text only feeds the
/// message.
pub enum ErrorSource {
    Typed(Arc<dyn std::error::Error + Send + Sync>),
    Text(String),
}

impl ErrorSource {
    /// Wrap a typed error value.
    #[must_use]
    pub fn typed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Typed(Arc::new(err))
    }
}

impl From<String> for ErrorSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ErrorSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Arc<dyn std::error::Error + Send + Sync>> for ErrorSource {
    fn from(err: Arc<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Typed(err)
    }
}

/// Accumulator for an [`ErrorRecord`].
///
/// Every mutator normalizes rather than rejects its input, so assembling an
/// error can itself never fail. Fields left unset are defaulted by the
/// build pipeline in a fixed order.
#[derive(Debug, Default)]
#[must_use]
pub struct Builder {
    domain: Domain,
    status_code: u16,
    message: String,
    custom_code: CustomCode,
    correlation_id: String,
    source: Option<String>,
    tags: Vec<String>,
    service: String,
    method: String,
    site: Option<CallSite>,
    internal_error: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Builder {
    /// Start a service-domain builder.
    pub fn new() -> Self {
        Self::for_domain(Domain::Service)
    }

    /// Start a storage-domain builder; its records carry no `source`.
    pub fn storage() -> Self {
        Self::for_domain(Domain::Storage)
    }

    /// Start a builder for an explicit domain.
    pub fn for_domain(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    /// Store the status code. Values outside [100,599] are remapped to 500.
    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = if (100..=599).contains(&status_code) {
            status_code
        } else {
            500
        };
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn custom_code(mut self, code: impl Into<CustomCode>) -> Self {
        self.custom_code = code.into();
        self
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    pub fn source(mut self, name: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self
    }

    /// Append tags, preserving call order. Duplicates are kept.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Caller-declared location metadata. The service name always survives;
    /// the method name is overwritten if the resolved call site carries a
    /// module path.
    pub fn location_hint(mut self, service: impl Into<String>, method: impl Into<String>) -> Self {
        self.service = service.into();
        self.method = method.into();
        self
    }

    /// Use an explicit call site instead of the one captured at build.
    pub fn call_site(mut self, site: CallSite) -> Self {
        self.site = Some(site);
        self
    }

    /// Derive message and internal error from an error value: typed errors
    /// are retained and contribute their text, plain text contributes the
    /// message alone.
    pub fn from_error(mut self, err: impl Into<ErrorSource>) -> Self {
        match err.into() {
            ErrorSource::Typed(err) => {
                self.message = err.to_string();
                self.internal_error = Some(err);
            }
            ErrorSource::Text(text) => {
                self.message = text;
                self.internal_error = None;
            }
        }
        self
    }

    /// Finalize the record, stamping `at` as its timestamp.
    ///
    /// The location is resolved from the call site of this method unless
    /// [`Builder::call_site`] supplied one.
    #[track_caller]
    pub fn build(self, at: DateTime<Utc>) -> ErrorRecord {
        self.build_with(at, [])
    }

    /// Finalize the record and apply `options` in order.
    ///
    /// The pipeline runs a fixed sequence: default the status code, the
    /// message, the custom code and the source; resolve the location; stamp
    /// the timestamp; run the options; and, when an option asked for a
    /// recapture, resolve the location once more from the supplied site.
    #[track_caller]
    pub fn build_with<I>(mut self, at: DateTime<Utc>, options: I) -> ErrorRecord
    where
        I: IntoIterator<Item = RecordOption>,
    {
        let captured = CallSite::capture();

        if self.status_code == 0 {
            self.status_code = 500;
        }
        let status = reason_phrase(self.status_code).to_owned();

        if self.message.is_empty() {
            self.message = status.clone();
        }
        if self.custom_code.is_empty() {
            self.custom_code = CustomCode::from_status(&status);
        }
        if self.source.as_deref().is_some_and(str::is_empty) {
            self.source = None;
        }
        if self.domain == Domain::Service && self.source.is_none() {
            self.source = Some(DEFAULT_SOURCE.to_owned());
        }

        let mut location = ErrorLocation {
            service: self.service,
            method: self.method,
            ..ErrorLocation::default()
        };
        location.resolve_from(self.site.unwrap_or(captured));

        let mut record = ErrorRecord {
            status_code: self.status_code,
            status,
            message: self.message,
            source: self.source,
            timestamp: at,
            custom_code: self.custom_code,
            location,
            correlation_id: self.correlation_id,
            tags: self.tags,
            internal_error: self.internal_error,
        };

        for option in options {
            option(&mut record);
        }

        if let Some(site) = record.location.recapture.take() {
            record.location.resolve_from(site);
        }

        record
    }
}
