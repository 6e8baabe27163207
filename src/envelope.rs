use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format written into every export, e.g. "2026/08/29 14:05"
pub const EXPORT_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// The versioned envelope carried by every export entity.
///
/// Records the platform code version and the local time at which the export
/// happened. The code version can later be used to check compatibility when
/// the bundle is imported into a different installation.
///
/// A stamp is created exactly once, when an entity is first built for export
/// (see [`ExportStamp::now`]). On the import path the stamp is deserialized
/// from the incoming mapping and is never rewritten, so the original export
/// date survives any number of round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStamp {
    /// Platform version string at export time
    pub code_version: String,

    /// Local time of the export, formatted as [`EXPORT_DATE_FORMAT`]
    pub export_date: String,
}

impl ExportStamp {
    /// Stamp the given platform version together with the current local time.
    ///
    /// The version string is supplied by the caller (the platform's version
    /// provider) rather than read from a global, so the crate stays usable
    /// from any host.
    pub fn now(code_version: &str) -> Self {
        ExportStamp {
            code_version: code_version.to_string(),
            export_date: Local::now().format(EXPORT_DATE_FORMAT).to_string(),
        }
    }
}
