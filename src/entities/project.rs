//! Project entity

use serde::{Deserialize, Serialize};

use crate::core::repository::{filter, Filter, Node, NodeKind};

/// A project; materials are created inside one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub name: String,
}

impl Project {
    pub fn by_name(name: &str) -> Filter {
        filter([("name", name)])
    }
}

impl Node for Project {
    const KIND: NodeKind = NodeKind::Project;

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
