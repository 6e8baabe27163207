//! Lookup interface against the persistence layer of the current installation.
//!
//! Export entities never embed local database rows; they store portable keys
//! and translate them back into rows on demand through a [`BurstStore`]. The
//! real implementation lives with the platform's persistence layer; this
//! module ships a [`HashMap`]-backed one for tests and small tools.

use std::collections::HashMap;

use crate::types::{OperationGid, PortletIdentifier};

/// An algorithm row as exposed by the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    /// Local database id (not portable across installations)
    pub id: i64,

    /// Module the algorithm lives in
    pub module: String,

    /// Class name of the algorithm within its module
    pub class_name: String,

    /// Human-readable name, used in log messages
    pub display_name: String,
}

/// An operation row as exposed by the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Local database id (not portable across installations)
    pub id: i64,

    /// Globally unique id, stable across installations
    pub gid: OperationGid,
}

/// A display portlet row as exposed by the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub struct Portlet {
    /// Local database id (not portable across installations)
    pub id: i64,

    /// Stable algorithm-identifier string
    pub algorithm_identifier: PortletIdentifier,

    /// Human-readable name
    pub name: String,
}

/// Contract for resolving portable references against the local installation.
///
/// All three lookups are independent synchronous point queries; a missing row
/// is reported as `None`, never as an error. Retries and caching, if any,
/// belong to the implementation, not to the export entities.
pub trait BurstStore {
    /// Find an algorithm by its module path and class name
    fn find_algorithm(&self, module: &str, class_name: &str) -> Option<Algorithm>;

    /// Find an operation by its globally unique id
    fn find_operation(&self, gid: &OperationGid) -> Option<Operation>;

    /// Find a portlet by its stable algorithm-identifier string
    fn find_portlet(&self, identifier: &PortletIdentifier) -> Option<Portlet>;
}

/// In-memory [`BurstStore`] backed by hash maps.
///
/// Intended for tests and demos; rows are registered up front with the
/// `add_*` methods and returned by clone from the lookups.
#[derive(Debug, Default)]
pub struct InMemoryBurstStore {
    algorithms: HashMap<(String, String), Algorithm>,
    operations: HashMap<OperationGid, Operation>,
    portlets: HashMap<PortletIdentifier, Portlet>,
}

impl InMemoryBurstStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an algorithm row
    pub fn add_algorithm(&mut self, algorithm: Algorithm) {
        let key = (algorithm.module.clone(), algorithm.class_name.clone());
        self.algorithms.insert(key, algorithm);
    }

    /// Register an operation row
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.insert(operation.gid.clone(), operation);
    }

    /// Register a portlet row
    pub fn add_portlet(&mut self, portlet: Portlet) {
        self.portlets
            .insert(portlet.algorithm_identifier.clone(), portlet);
    }
}

impl BurstStore for InMemoryBurstStore {
    fn find_algorithm(&self, module: &str, class_name: &str) -> Option<Algorithm> {
        self.algorithms
            .get(&(module.to_string(), class_name.to_string()))
            .cloned()
    }

    fn find_operation(&self, gid: &OperationGid) -> Option<Operation> {
        self.operations.get(gid).cloned()
    }

    fn find_portlet(&self, identifier: &PortletIdentifier) -> Option<Portlet> {
        self.portlets.get(identifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_return_registered_rows() {
        let mut store = InMemoryBurstStore::new();
        store.add_algorithm(Algorithm {
            id: 3,
            module: "simulators.fft".to_string(),
            class_name: "FourierAdapter".to_string(),
            display_name: "Fourier Analysis".to_string(),
        });
        store.add_operation(Operation {
            id: 7,
            gid: OperationGid::from("op-123"),
        });
        store.add_portlet(Portlet {
            id: 11,
            algorithm_identifier: PortletIdentifier::from("portlet-xyz"),
            name: "Time Series Viewer".to_string(),
        });

        let algorithm = store
            .find_algorithm("simulators.fft", "FourierAdapter")
            .unwrap();
        assert_eq!(algorithm.display_name, "Fourier Analysis");

        let operation = store.find_operation(&OperationGid::from("op-123")).unwrap();
        assert_eq!(operation.id, 7);

        let portlet = store
            .find_portlet(&PortletIdentifier::from("portlet-xyz"))
            .unwrap();
        assert_eq!(portlet.name, "Time Series Viewer");
    }

    #[test]
    fn test_lookups_return_none_for_unknown_keys() {
        let store = InMemoryBurstStore::new();

        assert!(store.find_algorithm("no.module", "NoClass").is_none());
        assert!(store.find_operation(&OperationGid::from("missing")).is_none());
        assert!(store
            .find_portlet(&PortletIdentifier::from("missing"))
            .is_none());
    }
}
