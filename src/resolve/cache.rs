//! Memoization cache for resolved paths.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::node::NodeId;

/// A resolution cache keyed by node id.
///
/// The cached URL for a node becomes stale whenever any of its ancestors
/// mutates; the propagator invalidates entries as it rewrites URLs, and a
/// reparent clears the whole cache since it can move an arbitrary subtree.
///
/// # Examples
///
/// ```
/// use pagetree::resolve::ResolveCache;
/// use pagetree::NodeId;
///
/// let cache = ResolveCache::new();
/// let id = NodeId::new("a").unwrap();
/// assert!(cache.get(&id).is_none());
///
/// cache.put(id.clone(), "/alpha".to_string());
/// assert_eq!(cache.get(&id).as_deref(), Some("/alpha"));
///
/// cache.invalidate(&id);
/// assert!(cache.get(&id).is_none());
/// ```
#[derive(Debug, Default)]
pub struct ResolveCache {
    entries: Mutex<HashMap<NodeId, String>>,
}

impl ResolveCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached path.
    ///
    /// A poisoned lock behaves as a miss; the cache is never load-bearing.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<String> {
        self.entries.lock().ok()?.get(id).cloned()
    }

    /// Stores a resolved path.
    pub fn put(&self, id: NodeId, path: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id, path);
        }
    }

    /// Drops the entry for one node.
    pub fn invalidate(&self, id: &NodeId) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(id);
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
