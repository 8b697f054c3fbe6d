//! Group entity

use serde::{Deserialize, Serialize};

use crate::core::repository::{filter, Filter, Node, NodeKind};

/// A group owning projects, collections and inventories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub name: String,
}

impl Group {
    /// Lookup filter for a group name
    pub fn by_name(name: &str) -> Filter {
        filter([("name", name)])
    }
}

impl Node for Group {
    const KIND: NodeKind = NodeKind::Group;

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }

    fn identity(&self) -> Filter {
        Self::by_name(&self.name)
    }
}
