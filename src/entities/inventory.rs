//! Inventory entity

use serde::{Deserialize, Serialize};

use crate::core::client::ClientError;
use crate::core::repository::{filter, Filter, Node, NodeKind};
use crate::entities::{Collection, Group, Material};

/// Reference to a stored material inside an inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRef {
    pub uid: String,
    pub name: String,
}

/// Named, ordered list of materials scoped to a group and collection
///
/// Identity is (group, collection, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Uid of the owning group
    pub group: String,

    /// Uid of the owning collection
    pub collection: String,

    pub name: String,

    #[serde(default)]
    pub materials: Vec<MaterialRef>,

    #[serde(default)]
    pub public: bool,
}

impl Inventory {
    /// An unsaved inventory with no materials
    pub fn new(
        name: impl Into<String>,
        group: &Group,
        collection: &Collection,
        public: bool,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            uid: None,
            group: group.require_uid()?.to_string(),
            collection: collection.require_uid()?.to_string(),
            name: name.into(),
            materials: Vec::new(),
            public,
        })
    }

    /// Append a saved material
    pub fn push(&mut self, material: &Material) -> Result<(), ClientError> {
        self.materials.push(MaterialRef {
            uid: material.require_uid()?.to_string(),
            name: material.name.clone(),
        });
        Ok(())
    }

    /// Material names in list order
    pub fn material_names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }
}

impl Node for Inventory {
    const KIND: NodeKind = NodeKind::Inventory;

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }

    fn identity(&self) -> Filter {
        filter([
            ("group", self.group.as_str()),
            ("collection", self.collection.as_str()),
            ("name", self.name.as_str()),
        ])
    }
}
