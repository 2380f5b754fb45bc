//! In-memory document store.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};

use super::DocumentStore;

/// A `HashMap`-backed document store.
///
/// Intended for tests and for hosts that keep their page tree in process
/// memory. All operations take an internal lock; like the trait it
/// implements, each mutation is atomic per document.
///
/// # Examples
///
/// ```
/// use pagetree::store::{DocumentStore, MemoryStore};
/// use pagetree::{Node, NodeId, Slug};
///
/// let store = MemoryStore::new();
/// let root = Node::builder(NodeId::new("r").unwrap(), Slug::new("home").unwrap()).build();
/// store.insert(&root).unwrap();
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: Mutex<HashMap<NodeId, Node>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored nodes.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.lock().expect("store lock poisoned").len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<NodeId, Node>>> {
        self.nodes.lock().map_err(|_| Error::Store {
            details: "memory store lock poisoned".to_string(),
        })
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &NodeId) -> Result<Option<Node>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn children_of(&self, id: &NodeId) -> Result<Vec<Node>> {
        let nodes = self.lock()?;
        let mut children: Vec<Node> = nodes
            .values()
            .filter(|node| node.parent.as_ref() == Some(id))
            .cloned()
            .collect();
        // Deterministic ordering for stable cascades and tests.
        children.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(children)
    }

    fn insert(&self, node: &Node) -> Result<()> {
        self.lock()?.insert(node.id.clone(), node.clone());
        Ok(())
    }

    fn set_url(&self, id: &NodeId, url: &str) -> Result<()> {
        let mut nodes = self.lock()?;
        let node = nodes.get_mut(id).ok_or_else(|| Error::NotFound {
            id: id.clone(),
        })?;
        node.url = Some(url.to_string());
        node.updated_at = Utc::now();
        Ok(())
    }

    fn set_parent(&self, id: &NodeId, parent: Option<NodeId>) -> Result<()> {
        let mut nodes = self.lock()?;
        let node = nodes.get_mut(id).ok_or_else(|| Error::NotFound {
            id: id.clone(),
        })?;
        node.parent = parent;
        node.updated_at = Utc::now();
        Ok(())
    }
}
