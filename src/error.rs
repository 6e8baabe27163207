use thiserror::Error;

/// All possible errors that can occur while converting export entities
/// to or from their dictionary form.
///
/// Note that an unresolvable reference (algorithm, operation or portlet
/// missing from the target installation) is deliberately *not* an error:
/// the resolving accessors return `None` for those, since the caller is
/// expected to decide whether to drop the affected step.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The input mapping is not a structure previously produced by `to_dict`
    /// (wrong shape, or a reserved key is absent)
    #[error("malformed export structure: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ExportError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::Malformed(_) => "ERR_BURST_EXPORT_MALFORMED",
        }
    }
}
