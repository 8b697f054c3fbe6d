//! Collection entity

use serde::{Deserialize, Serialize};

use crate::core::client::ClientError;
use crate::core::repository::{filter, Filter, Node, NodeKind};
use crate::entities::{Group, Project};

/// A collection inside a group and project; inventories hang off it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub name: String,

    /// Uid of the owning group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Uid of the owning project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Collection {
    /// Lookup filter: name plus the uids of both parents
    pub fn lookup(name: &str, group: &Group, project: &Project) -> Result<Filter, ClientError> {
        Ok(filter([
            ("name", name),
            ("group", group.require_uid()?),
            ("project", project.require_uid()?),
        ]))
    }
}

impl Node for Collection {
    const KIND: NodeKind = NodeKind::Collection;

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }

    fn identity(&self) -> Filter {
        let mut identity = filter([("name", self.name.as_str())]);
        if let Some(group) = &self.group {
            identity.insert("group".to_string(), group.clone());
        }
        if let Some(project) = &self.project {
            identity.insert("project".to_string(), project.clone());
        }
        identity
    }
}
