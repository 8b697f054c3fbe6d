//! Repository capability and typed get/save helpers
//!
//! The remote API is reduced to three operations: search by filter, create,
//! and update by uid. `get` and `save` are built on top of those so that the
//! create-or-update decision is made here and not inside a client library.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::core::client::ClientError;

/// Field filter used for lookups (`name=...`, `group=<uid>`, ...)
pub type Filter = BTreeMap<String, String>;

/// Node types this tool reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Group,
    Project,
    Collection,
    Inventory,
    Material,
}

impl NodeKind {
    /// Path segment used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Project => "project",
            NodeKind::Collection => "collection",
            NodeKind::Inventory => "inventory",
            NodeKind::Material => "material",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage backend capability: lookup, create, update
pub trait Repository {
    /// All nodes of `kind` whose fields equal every entry in `filter`
    fn search(&self, kind: NodeKind, filter: &Filter) -> Result<Vec<Value>, ClientError>;

    /// Create a node and return the stored representation (including its uid)
    fn create(&self, kind: NodeKind, body: &Value) -> Result<Value, ClientError>;

    /// Replace the node with `uid` and return the stored representation
    fn update(&self, kind: NodeKind, uid: &str, body: &Value) -> Result<Value, ClientError>;
}

/// A typed node that can be stored in a repository
pub trait Node: Serialize + DeserializeOwned {
    const KIND: NodeKind;

    fn uid(&self) -> Option<&str>;

    fn set_uid(&mut self, uid: String);

    /// Fields that make two nodes "the same object"
    fn identity(&self) -> Filter;

    /// Uid of a node that is expected to exist remotely
    fn require_uid(&self) -> Result<&str, ClientError> {
        self.uid()
            .ok_or(ClientError::MissingUid { kind: Self::KIND })
    }
}

/// What `save` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOutcome::Created => write!(f, "created"),
            SaveOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Build a filter from key/value pairs
pub fn filter<K, V, I>(pairs: I) -> Filter
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Render a filter as `k=v, k=v` for error messages
pub fn describe(filter: &Filter) -> String {
    filter
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn uid_of(value: &Value) -> Option<String> {
    match value.get("uid") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Fetch exactly one node matching `filter`
pub fn get<N: Node>(repo: &dyn Repository, filter: &Filter) -> Result<N, ClientError> {
    let mut found = repo.search(N::KIND, filter)?;
    match found.len() {
        0 => Err(ClientError::NotFound {
            kind: N::KIND,
            filter: describe(filter),
        }),
        1 => serde_json::from_value(found.remove(0)).map_err(|source| ClientError::Decode {
            kind: N::KIND,
            source,
        }),
        count => Err(ClientError::Ambiguous {
            kind: N::KIND,
            filter: describe(filter),
            count,
        }),
    }
}

/// Create or update `node` by identity
///
/// A node that already carries a uid is updated in place. Otherwise the
/// repository is searched by the node's identity: a match is updated when
/// `update_existing` is set (and rejected when it is not), no match creates a
/// new node. On return the node carries the stored uid; its other fields are
/// left exactly as the caller built them.
pub fn save<N: Node>(
    repo: &dyn Repository,
    node: &mut N,
    update_existing: bool,
) -> Result<SaveOutcome, ClientError> {
    let body = serde_json::to_value(&*node).map_err(|source| ClientError::Encode {
        kind: N::KIND,
        source,
    })?;

    let existing = match node.uid() {
        Some(uid) => Some(uid.to_string()),
        None => {
            let identity = node.identity();
            let matches = repo.search(N::KIND, &identity)?;
            if matches.len() > 1 {
                return Err(ClientError::Ambiguous {
                    kind: N::KIND,
                    filter: describe(&identity),
                    count: matches.len(),
                });
            }
            match matches.first() {
                Some(found) if update_existing => Some(uid_of(found).ok_or(
                    ClientError::MissingUid { kind: N::KIND },
                )?),
                Some(_) => {
                    return Err(ClientError::AlreadyExists {
                        kind: N::KIND,
                        filter: describe(&identity),
                    })
                }
                None => None,
            }
        }
    };

    match existing {
        Some(uid) => {
            debug!(kind = %N::KIND, %uid, "updating existing node");
            repo.update(N::KIND, &uid, &body)?;
            node.set_uid(uid);
            Ok(SaveOutcome::Updated)
        }
        None => {
            debug!(kind = %N::KIND, "creating node");
            let stored = repo.create(N::KIND, &body)?;
            let uid = uid_of(&stored).ok_or(ClientError::MissingUid { kind: N::KIND })?;
            node.set_uid(uid);
            Ok(SaveOutcome::Created)
        }
    }
}

/// A call recorded by `MemoryRepository`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    Search(NodeKind),
    Create(NodeKind),
    Update(NodeKind, String),
}

/// In-process repository used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryRepository {
    nodes: RefCell<Vec<(NodeKind, Value)>>,
    calls: RefCell<Vec<RepositoryCall>>,
    next_uid: Cell<u64>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node directly, bypassing the call log. Returns the assigned uid.
    pub fn seed(&self, kind: NodeKind, fields: Value) -> String {
        let uid = self.allocate_uid(kind);
        self.nodes
            .borrow_mut()
            .push((kind, with_uid(fields, &uid)));
        uid
    }

    /// Every call made through the `Repository` trait, in order
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.borrow().clone()
    }

    /// Stored nodes of one kind, in insertion order
    pub fn nodes(&self, kind: NodeKind) -> Vec<Value> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn allocate_uid(&self, kind: NodeKind) -> String {
        let n = self.next_uid.get() + 1;
        self.next_uid.set(n);
        format!("{}-{:04}", kind.as_str(), n)
    }

    fn matches(node: &Value, filter: &Filter) -> bool {
        filter.iter().all(|(key, expected)| match node.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *expected,
        })
    }
}

fn with_uid(mut fields: Value, uid: &str) -> Value {
    if let Value::Object(map) = &mut fields {
        map.insert("uid".to_string(), Value::String(uid.to_string()));
    }
    fields
}

impl Repository for MemoryRepository {
    fn search(&self, kind: NodeKind, filter: &Filter) -> Result<Vec<Value>, ClientError> {
        self.calls.borrow_mut().push(RepositoryCall::Search(kind));
        Ok(self
            .nodes
            .borrow()
            .iter()
            .filter(|(k, v)| *k == kind && Self::matches(v, filter))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn create(&self, kind: NodeKind, body: &Value) -> Result<Value, ClientError> {
        self.calls.borrow_mut().push(RepositoryCall::Create(kind));
        let uid = self.allocate_uid(kind);
        let stored = with_uid(body.clone(), &uid);
        self.nodes.borrow_mut().push((kind, stored.clone()));
        Ok(stored)
    }

    fn update(&self, kind: NodeKind, uid: &str, body: &Value) -> Result<Value, ClientError> {
        self.calls
            .borrow_mut()
            .push(RepositoryCall::Update(kind, uid.to_string()));
        let stored = with_uid(body.clone(), uid);
        let mut nodes = self.nodes.borrow_mut();
        let slot = nodes
            .iter_mut()
            .find(|(k, v)| *k == kind && uid_of(v).as_deref() == Some(uid))
            .ok_or_else(|| ClientError::NotFound {
                kind,
                filter: format!("uid={}", uid),
            })?;
        slot.1 = stored.clone();
        Ok(stored)
    }
}
