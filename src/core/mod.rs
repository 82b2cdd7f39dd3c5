pub mod value;
pub mod value_path;

use std::borrow::Borrow;
use std::fmt;

use crate::core::value_path::ValuePath;

/// Identifier of a rendered control. Field controls use the `form::path` selector form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id of the control bound to `path` inside the form identified by `self`.
    pub fn field(&self, path: &ValuePath) -> Self {
        Self(format!("{}::{}", self.0, path))
    }

    /// Id of an auxiliary node owned by `self` (message lines, buttons, sub-forms).
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self(format!("{}__{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&String> for NodeId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}
