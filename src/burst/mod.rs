//! The exported burst hierarchy: a burst owns workflows, a workflow owns
//! computational steps and view steps.
//!
//! Every entity in the tree is a plain serde record carrying the export
//! stamp, its reserved fields and an open map of extra scalar fields, so the
//! whole tree flattens into one nested JSON structure via `to_dict` and comes
//! back via `load_from_dict`.

mod step;

pub use step::{StepInfo, ViewStepInfo, WorkflowStepInfo};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::envelope::ExportStamp;
use crate::error::ExportError;

/// The closed set of reserved keys used in the dictionary form.
///
/// Except for the envelope pair, every reserved key begins and ends with the
/// `--` marker. Consumers of the exported structure must treat these keys as
/// opaque and preserve them verbatim across a round trip.
pub mod dict_keys {
    /// Platform version at export time (envelope)
    pub const CODE_VERSION: &str = "code_version";
    /// Local time of the export (envelope)
    pub const EXPORT_DATE: &str = "export_date";
    /// Ordered workflows of a burst
    pub const BURST_WORKFLOWS: &str = "--burst_workflows--";
    /// Ordered computational steps of a workflow
    pub const WORKFLOW_STEPS: &str = "--workflow_steps--";
    /// Ordered view steps of a workflow
    pub const VIEW_STEPS: &str = "--view_steps--";
    /// Portable algorithm key of a step
    pub const ALGORITHM_INFO: &str = "--algorithm_info--";
    /// Operation gid of a workflow step
    pub const OPERATION_GID: &str = "--operation_gid--";
    /// Portlet identifier of a view step
    pub const PORTLET_IDENTIFIER: &str = "--portlet_identifier--";
}

/// One workflow of an exported burst: an ordered pipeline of computational
/// steps plus the view steps visualizing their results.
///
/// The two sequences are independent and both default to empty, so every
/// accessor is valid immediately after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInfo {
    #[serde(flatten)]
    stamp: ExportStamp,

    // No serde default on the sequences: a mapping handed to the loader
    // without them was not produced by to_dict and must be rejected.
    #[serde(rename = "--workflow_steps--")]
    workflow_steps: Vec<WorkflowStepInfo>,

    #[serde(rename = "--view_steps--")]
    view_steps: Vec<ViewStepInfo>,

    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl WorkflowInfo {
    /// Create an empty workflow, stamped with the given platform version
    pub fn new(code_version: &str) -> Self {
        WorkflowInfo {
            stamp: ExportStamp::now(code_version),
            workflow_steps: Vec::new(),
            view_steps: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Append a computational step to this workflow
    pub fn add_workflow_step(&mut self, step: WorkflowStepInfo) {
        self.workflow_steps.push(step);
    }

    /// Append a view step to this workflow
    pub fn add_view_step(&mut self, step: ViewStepInfo) {
        self.view_steps.push(step);
    }

    /// Replace the entire list of computational steps
    pub fn set_workflow_steps(&mut self, steps: Vec<WorkflowStepInfo>) {
        self.workflow_steps = steps;
    }

    /// Replace the entire list of view steps
    pub fn set_view_steps(&mut self, steps: Vec<ViewStepInfo>) {
        self.view_steps = steps;
    }

    /// The computational steps of this workflow, in insertion order
    pub fn workflow_steps(&self) -> &[WorkflowStepInfo] {
        &self.workflow_steps
    }

    /// The view steps of this workflow, in insertion order
    pub fn view_steps(&self) -> &[ViewStepInfo] {
        &self.view_steps
    }

    /// Set an extra scalar field on this workflow.
    ///
    /// `name` must not collide with a reserved key (see [`dict_keys`]).
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.extra.insert(name.to_string(), value);
    }

    /// Read back an extra scalar field, if present
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// Convert this workflow to its plain dictionary form, recursively
    /// converting every contained step. The workflow itself is not mutated.
    pub fn to_dict(&self) -> Result<serde_json::Value, ExportError> {
        serde_json::to_value(self).map_err(ExportError::from)
    }

    /// Rebuild a workflow from a mapping produced by [`WorkflowInfo::to_dict`],
    /// reconstructing both step sequences along the way.
    pub fn load_from_dict(input: serde_json::Value) -> Result<Self, ExportError> {
        serde_json::from_value(input).map_err(ExportError::from)
    }
}

/// An exported burst: a recorded simulation run with all its workflows,
/// movable between installations as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurstInfo {
    #[serde(flatten)]
    stamp: ExportStamp,

    #[serde(rename = "--burst_workflows--")]
    workflows: Vec<WorkflowInfo>,

    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl BurstInfo {
    /// Create an empty burst, stamped with the given platform version
    pub fn new(code_version: &str) -> Self {
        BurstInfo {
            stamp: ExportStamp::now(code_version),
            workflows: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Append a workflow to this burst
    pub fn add_workflow(&mut self, workflow: WorkflowInfo) {
        self.workflows.push(workflow);
    }

    /// Replace the entire list of workflows
    pub fn set_workflows(&mut self, workflows: Vec<WorkflowInfo>) {
        self.workflows = workflows;
    }

    /// The workflows of this burst, in insertion order
    pub fn workflows(&self) -> &[WorkflowInfo] {
        &self.workflows
    }

    /// Set an extra scalar field on this burst.
    ///
    /// `name` must not collide with a reserved key (see [`dict_keys`]).
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.extra.insert(name.to_string(), value);
    }

    /// Read back an extra scalar field, if present
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// Convert this burst to its plain dictionary form, recursively
    /// converting every workflow and step it contains. The result is a tree
    /// of mappings, sequences and scalars with no cycles, ready for JSON
    /// encoding; the burst itself is not mutated.
    pub fn to_dict(&self) -> Result<serde_json::Value, ExportError> {
        serde_json::to_value(self).map_err(ExportError::from)
    }

    /// Rebuild a burst from a mapping produced by [`BurstInfo::to_dict`],
    /// reconstructing the whole workflow tree.
    ///
    /// Algorithm, operation and portlet references are *not* resolved here;
    /// resolution happens lazily when the step accessors are called with a
    /// store.
    pub fn load_from_dict(input: serde_json::Value) -> Result<Self, ExportError> {
        debug!("Loading BurstInfo from {}", input);
        serde_json::from_value(input).map_err(ExportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_burst_and_workflow_are_empty() {
        let burst = BurstInfo::new("2.8.1");
        assert!(burst.workflows().is_empty());

        let workflow = WorkflowInfo::new("2.8.1");
        assert!(workflow.workflow_steps().is_empty());
        assert!(workflow.view_steps().is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut workflow = WorkflowInfo::new("2.8.1");
        for position in 0..3 {
            let mut step = WorkflowStepInfo::new("2.8.1");
            step.set_field("index_in_tab", json!(position));
            workflow.add_workflow_step(step);
        }

        let positions: Vec<i64> = workflow
            .workflow_steps()
            .iter()
            .map(|step| step.index().1)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);

        let mut burst = BurstInfo::new("2.8.1");
        for name in ["first", "second", "third"] {
            let mut wf = WorkflowInfo::new("2.8.1");
            wf.set_field("name", json!(name));
            burst.add_workflow(wf);
        }
        let names: Vec<&str> = burst
            .workflows()
            .iter()
            .map(|wf| wf.field("name").and_then(|name| name.as_str()).unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut workflow = WorkflowInfo::new("2.8.1");
        workflow.add_workflow_step(WorkflowStepInfo::new("2.8.1"));
        workflow.set_workflow_steps(Vec::new());
        assert!(workflow.workflow_steps().is_empty());

        workflow.add_view_step(ViewStepInfo::new("2.8.1"));
        workflow.set_view_steps(Vec::new());
        assert!(workflow.view_steps().is_empty());

        let mut burst = BurstInfo::new("2.8.1");
        burst.add_workflow(workflow);
        burst.set_workflows(Vec::new());
        assert!(burst.workflows().is_empty());
    }

    #[test]
    fn test_dict_form_uses_the_reserved_keys() {
        use crate::store::{Algorithm, Operation, Portlet};
        use crate::types::{OperationGid, PortletIdentifier};

        let algorithm = Algorithm {
            id: 1,
            module: "analyzers.fourier".to_string(),
            class_name: "FourierAdapter".to_string(),
            display_name: "Fourier Analysis".to_string(),
        };

        let mut wf_step = WorkflowStepInfo::new("2.8.1");
        wf_step.set_algorithm(&algorithm);
        wf_step.set_operation(&Operation {
            id: 1,
            gid: OperationGid::from("op-123"),
        });
        let mut view_step = ViewStepInfo::new("2.8.1");
        view_step.set_portlet(&Portlet {
            id: 1,
            algorithm_identifier: PortletIdentifier::from("portlet-xyz"),
            name: "Viewer".to_string(),
        });

        let mut workflow = WorkflowInfo::new("2.8.1");
        workflow.add_workflow_step(wf_step);
        workflow.add_view_step(view_step);
        let mut burst = BurstInfo::new("2.8.1");
        burst.add_workflow(workflow);

        let exported = burst.to_dict().unwrap();
        let burst_map = exported.as_object().unwrap();
        assert!(burst_map.contains_key(dict_keys::CODE_VERSION));
        assert!(burst_map.contains_key(dict_keys::EXPORT_DATE));

        let workflow_map = exported[dict_keys::BURST_WORKFLOWS][0].as_object().unwrap();
        assert!(workflow_map.contains_key(dict_keys::WORKFLOW_STEPS));
        assert!(workflow_map.contains_key(dict_keys::VIEW_STEPS));
        assert!(workflow_map.contains_key(dict_keys::CODE_VERSION));

        let wf_step_map = workflow_map[dict_keys::WORKFLOW_STEPS][0].as_object().unwrap();
        assert!(wf_step_map.contains_key(dict_keys::ALGORITHM_INFO));
        assert!(wf_step_map.contains_key(dict_keys::OPERATION_GID));

        let view_step_map = workflow_map[dict_keys::VIEW_STEPS][0].as_object().unwrap();
        assert!(view_step_map.contains_key(dict_keys::PORTLET_IDENTIFIER));
    }

    #[test]
    fn test_loader_rejects_mapping_without_reserved_keys() {
        // A mapping that never came out of to_dict: no workflow sequence
        let input = json!({
            "code_version": "2.8.1",
            "export_date": "2019/03/14 09:26",
        });

        let result = BurstInfo::load_from_dict(input);
        match result {
            Err(err @ ExportError::Malformed(_)) => {
                assert_eq!(err.error_code(), "ERR_BURST_EXPORT_MALFORMED");
            }
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_reconstruction_keeps_the_original_stamp() {
        let mut exported = BurstInfo::new("2.8.1").to_dict().unwrap();
        exported["code_version"] = json!("1.0.0");
        exported["export_date"] = json!("2019/03/14 09:26");

        let restored = BurstInfo::load_from_dict(exported).unwrap();
        let round_tripped = restored.to_dict().unwrap();
        assert_eq!(round_tripped["code_version"], json!("1.0.0"));
        assert_eq!(round_tripped["export_date"], json!("2019/03/14 09:26"));
    }
}
