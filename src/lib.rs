//! # Burst Export
//!
//! Transient in-memory entities describing a *burst* (a recorded simulation
//! run with its workflows and steps), convertible to and from a portable
//! nested dictionary so bursts can be moved between two installations of the
//! research platform.
//!
//! ## Features
//!
//! * Typed descriptors for bursts, workflows, computational steps and view steps
//! * One-call serialization of the whole tree to a plain JSON structure
//! * Reconstruction from that structure with lazy reference resolution
//! * Portable references only: algorithms by module/class, operations by gid,
//!   portlets by identifier, never by local database id
//! * Arbitrary extra scalar fields survive a round trip untouched
//!
//! ## Example
//!
//! ```
//! use burst_export::{BurstInfo, WorkflowInfo, WorkflowStepInfo};
//!
//! // Export side: build the tree and flatten it
//! let mut workflow = WorkflowInfo::new("2.8.1");
//! workflow.add_workflow_step(WorkflowStepInfo::new("2.8.1"));
//! let mut burst = BurstInfo::new("2.8.1");
//! burst.add_workflow(workflow);
//!
//! let exported = burst.to_dict().unwrap();
//!
//! // Import side: rebuild the tree from the flattened form
//! let restored = BurstInfo::load_from_dict(exported.clone()).unwrap();
//! assert_eq!(restored.to_dict().unwrap(), exported);
//! ```

mod envelope;
mod error;
mod types;

pub mod burst;
pub mod store;

pub use burst::{dict_keys, BurstInfo, StepInfo, ViewStepInfo, WorkflowInfo, WorkflowStepInfo};
pub use envelope::{ExportStamp, EXPORT_DATE_FORMAT};
pub use error::ExportError;
pub use store::{Algorithm, BurstStore, InMemoryBurstStore, Operation, Portlet};
pub use types::{AlgorithmKey, OperationGid, PortletIdentifier};

/// Decode a burst from the JSON text of an export bundle.
///
/// This is the convenience entry point for the archive packager, equivalent
/// to parsing the text and handing the resulting mapping to
/// [`BurstInfo::load_from_dict`].
///
/// # Errors
///
/// Returns [`ExportError::Malformed`] when the text is not valid JSON or the
/// structure was not produced by [`dump_burst_export`] / [`BurstInfo::to_dict`].
pub fn load_burst_export(json_text: &str) -> Result<BurstInfo, ExportError> {
    let input: serde_json::Value = serde_json::from_str(json_text)?;
    BurstInfo::load_from_dict(input)
}

/// Encode a burst to pretty-printed JSON text for an export bundle.
pub fn dump_burst_export(burst: &BurstInfo) -> Result<String, ExportError> {
    let dict = burst.to_dict()?;
    serde_json::to_string_pretty(&dict).map_err(ExportError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_text_round_trip() {
        let mut workflow = WorkflowInfo::new("2.8.1");
        workflow.add_workflow_step(WorkflowStepInfo::new("2.8.1"));
        workflow.add_view_step(ViewStepInfo::new("2.8.1"));
        let mut burst = BurstInfo::new("2.8.1");
        burst.add_workflow(workflow);

        let text = dump_burst_export(&burst).unwrap();
        let restored = load_burst_export(&text).unwrap();

        assert_eq!(restored.to_dict().unwrap(), burst.to_dict().unwrap());
        assert_eq!(restored.workflows().len(), 1);
        assert_eq!(restored.workflows()[0].workflow_steps().len(), 1);
        assert_eq!(restored.workflows()[0].view_steps().len(), 1);
    }

    #[test]
    fn test_invalid_json_text_is_malformed() {
        let result = load_burst_export("{ this is not json");
        assert!(matches!(result, Err(ExportError::Malformed(_))));
    }
}
