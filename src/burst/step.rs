use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::envelope::ExportStamp;
use crate::error::ExportError;
use crate::store::{Algorithm, BurstStore, Operation, Portlet};
use crate::types::{AlgorithmKey, OperationGid, PortletIdentifier};

/// State shared by every step of an exported workflow.
///
/// Holds the export stamp, the portable key of the algorithm backing the
/// step, and an open map of extra scalar fields (tab placement, user-chosen
/// parameters, ...) that round-trips untouched through an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInfo {
    #[serde(flatten)]
    stamp: ExportStamp,

    #[serde(
        rename = "--algorithm_info--",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    algorithm_info: Option<AlgorithmKey>,

    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl StepInfo {
    /// Create an empty step, stamped with the given platform version
    pub fn new(code_version: &str) -> Self {
        StepInfo {
            stamp: ExportStamp::now(code_version),
            algorithm_info: None,
            extra: HashMap::new(),
        }
    }

    /// Store the portable key of the given algorithm, so the same algorithm
    /// can be found again in the target installation even though its local id
    /// will differ. Overwrites any previously stored key.
    pub fn set_algorithm(&mut self, algorithm: &Algorithm) {
        self.algorithm_info = Some(AlgorithmKey::new(
            algorithm.module.clone(),
            algorithm.class_name.clone(),
        ));
    }

    /// The portable algorithm key stored on this step, if any
    pub fn algorithm_key(&self) -> Option<&AlgorithmKey> {
        self.algorithm_info.as_ref()
    }

    /// Resolve the stored algorithm key against the local installation.
    ///
    /// Returns `None` if no algorithm was ever set on this step, or if the
    /// store no longer knows the stored module/class pair.
    pub fn algorithm(&self, store: &dyn BurstStore) -> Option<Algorithm> {
        let key = self.algorithm_info.as_ref()?;
        store.find_algorithm(&key.module, &key.class_name)
    }

    /// Set an extra scalar field on this step.
    ///
    /// `name` must not collide with a reserved key (see [`crate::dict_keys`]).
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.extra.insert(name.to_string(), value);
    }

    /// Read back an extra scalar field, if present
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }

    /// The `(tab_index, index_in_tab)` pair placing this step within its
    /// workflow, each defaulting to `-1` when absent.
    ///
    /// The pair uniquely identifies a step inside a workflow; importers use
    /// it to clean up view steps whose algorithm no longer exists in the
    /// target installation.
    pub fn index(&self) -> (i64, i64) {
        let read = |name: &str| {
            self.extra
                .get(name)
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(-1)
        };
        (read("tab_index"), read("index_in_tab"))
    }

    /// Convert this step to its plain dictionary form.
    ///
    /// Steps hold no nested entities, so this is a flat mapping of the
    /// stamp, the algorithm key and the extra fields.
    pub fn to_dict(&self) -> Result<serde_json::Value, ExportError> {
        serde_json::to_value(self).map_err(ExportError::from)
    }
}

/// A view step: a step backed by a display portlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewStepInfo {
    #[serde(flatten)]
    step: StepInfo,

    #[serde(
        rename = "--portlet_identifier--",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    portlet_identifier: Option<PortletIdentifier>,
}

impl ViewStepInfo {
    /// Create an empty view step, stamped with the given platform version
    pub fn new(code_version: &str) -> Self {
        ViewStepInfo {
            step: StepInfo::new(code_version),
            portlet_identifier: None,
        }
    }

    /// Store the given portlet's stable identifier, so the same portlet can
    /// be found again in the target installation regardless of local ids
    pub fn set_portlet(&mut self, portlet: &Portlet) {
        self.portlet_identifier = Some(portlet.algorithm_identifier.clone());
    }

    /// Resolve the stored portlet identifier against the local installation.
    ///
    /// Returns `None` if no portlet was ever set, or if the store no longer
    /// knows the identifier.
    pub fn portlet(&self, store: &dyn BurstStore) -> Option<Portlet> {
        let identifier = self.portlet_identifier.as_ref()?;
        store.find_portlet(identifier)
    }

    /// See [`StepInfo::set_algorithm`]
    pub fn set_algorithm(&mut self, algorithm: &Algorithm) {
        self.step.set_algorithm(algorithm);
    }

    /// See [`StepInfo::algorithm`]
    pub fn algorithm(&self, store: &dyn BurstStore) -> Option<Algorithm> {
        self.step.algorithm(store)
    }

    /// See [`StepInfo::algorithm_key`]
    pub fn algorithm_key(&self) -> Option<&AlgorithmKey> {
        self.step.algorithm_key()
    }

    /// See [`StepInfo::set_field`]
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.step.set_field(name, value);
    }

    /// See [`StepInfo::field`]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.step.field(name)
    }

    /// See [`StepInfo::index`]
    pub fn index(&self) -> (i64, i64) {
        self.step.index()
    }

    /// Convert this view step to its plain dictionary form
    pub fn to_dict(&self) -> Result<serde_json::Value, ExportError> {
        serde_json::to_value(self).map_err(ExportError::from)
    }

    /// Rebuild a view step from a mapping produced by [`ViewStepInfo::to_dict`].
    ///
    /// View steps hold no nested entities, so this is a direct decode.
    pub fn load_from_dict(input: serde_json::Value) -> Result<Self, ExportError> {
        serde_json::from_value(input).map_err(ExportError::from)
    }
}

/// A workflow step: a step backed by a data-processing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStepInfo {
    #[serde(flatten)]
    step: StepInfo,

    #[serde(
        rename = "--operation_gid--",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    operation_gid: Option<OperationGid>,
}

impl WorkflowStepInfo {
    /// Create an empty workflow step, stamped with the given platform version
    pub fn new(code_version: &str) -> Self {
        WorkflowStepInfo {
            step: StepInfo::new(code_version),
            operation_gid: None,
        }
    }

    /// Store the given operation's globally unique id, so the operation can
    /// be found again in the target installation where its local id differs
    pub fn set_operation(&mut self, operation: &Operation) {
        self.operation_gid = Some(operation.gid.clone());
    }

    /// The operation gid stored on this step, if any
    pub fn operation_gid(&self) -> Option<&OperationGid> {
        self.operation_gid.as_ref()
    }

    /// Translate the stored operation gid into the local id of the current
    /// installation.
    ///
    /// Returns `None` if no operation was ever set. If a gid is stored but
    /// the store cannot find it, a warning naming the owning algorithm and
    /// the missing gid is emitted and `None` is returned; this is a
    /// recoverable condition and the caller decides whether to drop the step.
    pub fn operation_id(&self, store: &dyn BurstStore) -> Option<i64> {
        let gid = self.operation_gid.as_ref()?;

        match store.find_operation(gid) {
            Some(operation) => Some(operation.id),
            None => {
                let algorithm_name = self
                    .step
                    .algorithm(store)
                    .map(|algorithm| algorithm.display_name)
                    .or_else(|| self.step.algorithm_key().map(|key| key.class_name.clone()))
                    .unwrap_or_else(|| "<unknown algorithm>".to_string());
                warn!(
                    "Could not find operation with gid {} while restoring workflow step for {}",
                    gid, algorithm_name
                );
                None
            }
        }
    }

    /// See [`StepInfo::set_algorithm`]
    pub fn set_algorithm(&mut self, algorithm: &Algorithm) {
        self.step.set_algorithm(algorithm);
    }

    /// See [`StepInfo::algorithm`]
    pub fn algorithm(&self, store: &dyn BurstStore) -> Option<Algorithm> {
        self.step.algorithm(store)
    }

    /// See [`StepInfo::algorithm_key`]
    pub fn algorithm_key(&self) -> Option<&AlgorithmKey> {
        self.step.algorithm_key()
    }

    /// See [`StepInfo::set_field`]
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.step.set_field(name, value);
    }

    /// See [`StepInfo::field`]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.step.field(name)
    }

    /// See [`StepInfo::index`]
    pub fn index(&self) -> (i64, i64) {
        self.step.index()
    }

    /// Convert this workflow step to its plain dictionary form
    pub fn to_dict(&self) -> Result<serde_json::Value, ExportError> {
        serde_json::to_value(self).map_err(ExportError::from)
    }

    /// Rebuild a workflow step from a mapping produced by
    /// [`WorkflowStepInfo::to_dict`]. Direct decode, no nested entities.
    pub fn load_from_dict(input: serde_json::Value) -> Result<Self, ExportError> {
        serde_json::from_value(input).map_err(ExportError::from)
    }
}
