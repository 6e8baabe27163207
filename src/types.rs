use serde::{Deserialize, Serialize};
use std::fmt;

/// The globally unique id of an operation (e.g. a UUID string).
///
/// Unlike the numeric id an operation carries in a local database, the gid is
/// stable across installations, which is what makes it safe to embed in an
/// export bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationGid(pub String);

impl From<String> for OperationGid {
    fn from(s: String) -> Self {
        OperationGid(s)
    }
}

impl From<&str> for OperationGid {
    fn from(s: &str) -> Self {
        OperationGid(s.to_string())
    }
}

impl AsRef<str> for OperationGid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stable algorithm-identifier string of a display portlet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortletIdentifier(pub String);

impl From<String> for PortletIdentifier {
    fn from(s: String) -> Self {
        PortletIdentifier(s)
    }
}

impl From<&str> for PortletIdentifier {
    fn from(s: &str) -> Self {
        PortletIdentifier(s.to_string())
    }
}

impl AsRef<str> for PortletIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortletIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The portable key of an algorithm: its module path and class name.
///
/// This pair identifies the same algorithm in any installation, regardless of
/// the numeric id the local database assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlgorithmKey {
    /// Module the algorithm lives in
    pub module: String,

    /// Class name of the algorithm within its module
    pub class_name: String,
}

impl AlgorithmKey {
    /// Create a key from a module path and class name
    pub fn new(module: impl Into<String>, class_name: impl Into<String>) -> Self {
        AlgorithmKey {
            module: module.into(),
            class_name: class_name.into(),
        }
    }
}

impl fmt::Display for AlgorithmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.class_name)
    }
}
