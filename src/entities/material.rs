//! Material entity

use serde::{Deserialize, Serialize};

use crate::core::repository::{filter, Filter, Node, NodeKind};

/// Key/value identifier attached to a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub key: String,
    pub value: String,
}

impl Identifier {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A material record; its name is its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Uid of the owning group
    pub group: String,

    /// Uid of the owning project
    pub project: String,

    pub name: String,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    /// Free-form notes, stored as a JSON-encoded string
    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub public: bool,
}

impl Material {
    /// Value of the first identifier with `key`
    pub fn identifier(&self, key: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|i| i.key == key)
            .map(|i| i.value.as_str())
    }
}

impl Node for Material {
    const KIND: NodeKind = NodeKind::Material;

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }

    fn identity(&self) -> Filter {
        filter([("name", self.name.as_str())])
    }
}
