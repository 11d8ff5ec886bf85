//! Late-binding overrides applied to a record at build time.

use crate::location::CallSite;
use crate::record::ErrorRecord;

/// Override function applied to the finished record, in the order supplied
/// to [`Builder::build_with`](crate::Builder::build_with). Each option may
/// overwrite any field.
pub type RecordOption = Box<dyn FnOnce(&mut ErrorRecord) + Send>;

/// Overwrite the record's correlation id.
#[must_use]
pub fn correlation_id(id: impl Into<String>) -> RecordOption {
    let id = id.into();
    Box::new(move |record| record.correlation_id = id)
}

/// Re-resolve the location fields from `site` after every option has run.
///
/// This is the escape hatch for wrapping layers: a helper that builds
/// records on behalf of its own caller passes the caller's site through
/// this option so the record points past the helper.
#[must_use]
pub fn recapture(site: CallSite) -> RecordOption {
    Box::new(move |record| record.location.recapture = Some(site))
}

/// Append a tag to the record.
#[must_use]
pub fn tag(tag: impl Into<String>) -> RecordOption {
    let tag = tag.into();
    Box::new(move |record| record.tags.push(tag))
}
