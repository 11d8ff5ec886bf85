//! Error record data model (pure data, no HTTP framework dependencies).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::builder::Builder;
use crate::code::CustomCode;
use crate::location::CallSite;
use crate::options::RecordOption;

/// Origin system name recorded when a service-domain record leaves
/// [`ErrorRecord::source`] unset.
pub const DEFAULT_SOURCE: &str = "northbeam";

/// Which family of records a builder produces.
///
/// Both families share one schema; the only difference is that service
/// records carry an originating system name (`source`, defaulted to
/// [`DEFAULT_SOURCE`]) while storage records omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    #[default]
    Service,
    Storage,
}

/// Reason phrase for an HTTP status code.
///
/// Codes inside [100,599] that have no registered phrase render as
/// `"Unknown Status"` so that downstream defaulting never produces an empty
/// message or code.
#[must_use]
pub fn reason_phrase(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// Structured, serializable error record for HTTP services.
///
/// Records are assembled through [`Builder`] (or the [`ErrorRecord::new`]
/// facade) and treated as immutable afterwards; each one lives for a single
/// error-handling pass. The serialized shape uses snake_case field names,
/// omits `location` and `tags` when empty, and never includes
/// `internal_error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct ErrorRecord {
    /// HTTP status code, always within [100,599] after build.
    pub status_code: u16,
    /// Canonical reason phrase for `status_code`.
    pub status: String,
    /// Human-readable description; never empty after build.
    pub message: String,
    /// Origin system name; omitted from the serialized form when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Point in time the record was finalized, supplied by the caller of
    /// build so that construction stays deterministic under test.
    pub timestamp: DateTime<Utc>,
    /// Machine-readable classification code; never empty after build.
    pub custom_code: CustomCode,
    /// Where the error was raised; omitted when entirely empty.
    #[serde(default, skip_serializing_if = "ErrorLocation::is_empty")]
    pub location: ErrorLocation,
    /// Opaque identifier correlating the record to the upstream request.
    pub correlation_id: String,
    /// Free-text labels in the order they were appended.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// The underlying error when the record was built from a typed error
    /// value. Never serialized.
    #[serde(skip)]
    pub internal_error: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ErrorRecord {
    /// Build a record with the common status + message pair, stamped with
    /// the current UTC time. The call site of this constructor becomes the
    /// recorded location.
    #[track_caller]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Builder::new()
            .status_code(status_code)
            .message(message)
            .build(Utc::now())
    }

    /// Like [`ErrorRecord::new`], with override options applied in order.
    #[track_caller]
    pub fn new_with<I>(status_code: u16, message: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = RecordOption>,
    {
        Builder::new()
            .status_code(status_code)
            .message(message)
            .build_with(Utc::now(), options)
    }

    /// Start a service-domain builder.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Drop the location fields, e.g. before the record leaves a
    /// non-development environment.
    pub fn redact_location(&mut self) {
        self.location = ErrorLocation::default();
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status_code, self.status, self.message)
    }
}

impl std::error::Error for ErrorRecord {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.internal_error
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Composite location of the point where an error was raised.
///
/// Each component is omitted from the serialized form at its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    /// Caller-supplied logical service name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service: String,
    /// Qualified name of the raising module or function.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    /// Source file path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page: String,
    /// Line within `page`.
    #[serde(default, skip_serializing_if = "line_is_zero")]
    pub line: u32,
    /// When set by an option, the location fields are re-resolved from this
    /// site as the last build stage. Never serialized.
    #[serde(skip)]
    pub recapture: Option<CallSite>,
}

impl ErrorLocation {
    /// True when every serialized component is at its zero value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_empty() && self.method.is_empty() && self.page.is_empty() && self.line == 0
    }

    /// Overwrite the resolved components from `site`.
    ///
    /// A blank module path leaves `method` untouched so that a
    /// caller-declared hint survives a partial capture; `service` is never
    /// written here.
    pub(crate) fn resolve_from(&mut self, site: CallSite) {
        if !site.module().is_empty() {
            self.method = site.module().to_owned();
        }
        self.page = site.file().to_owned();
        self.line = site.line();
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires the &T signature
fn line_is_zero(line: &u32) -> bool {
    *line == 0
}
