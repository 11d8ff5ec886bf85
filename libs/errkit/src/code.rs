//! Machine-readable error codes carried alongside the numeric HTTP status.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Short machine-readable classification code, distinct from the numeric
/// status code.
///
/// Codes derived from a reason phrase drop the spaces, so `"Not Found"`
/// becomes `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomCode(Cow<'static, str>);

impl CustomCode {
    /// Code reported for unclassified server-side failures.
    pub const INTERNAL_SERVER_ERROR: CustomCode = CustomCode::from_static("InternalServerError");

    /// Code reported when the requested entity does not exist.
    pub const NOT_FOUND: CustomCode = CustomCode::from_static("NotFound");

    /// Build a code from a static string without allocating.
    #[must_use]
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Build a code from an arbitrary string.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    /// Derive a code from a reason phrase by removing all spaces.
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        Self(Cow::Owned(status.replace(' ', "")))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CustomCode {
    fn default() -> Self {
        Self(Cow::Borrowed(""))
    }
}

impl fmt::Display for CustomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CustomCode {
    fn from(code: &'static str) -> Self {
        Self::from_static(code)
    }
}

impl From<String> for CustomCode {
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn from_status_removes_every_space() {
        assert_eq!(CustomCode::from_status("Not Found").as_str(), "NotFound");
        assert_eq!(
            CustomCode::from_status("HTTP Version Not Supported").as_str(),
            "HTTPVersionNotSupported"
        );
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(CustomCode::INTERNAL_SERVER_ERROR.as_str(), "InternalServerError");
        assert_eq!(CustomCode::NOT_FOUND.as_str(), "NotFound");
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let json = serde_json::to_string(&CustomCode::NOT_FOUND).unwrap();
        assert_eq!(json, "\"NotFound\"");
    }

    #[test]
    fn default_is_empty() {
        assert!(CustomCode::default().is_empty());
        assert!(!CustomCode::NOT_FOUND.is_empty());
    }
}
