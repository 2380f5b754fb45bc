//! Document store abstraction.
//!
//! The host CMS owns the real document store; this crate only needs a narrow
//! slice of it: point lookup, a single-level children query, and atomic
//! single-document field updates. That slice is the [`DocumentStore`] trait.
//!
//! Two implementations are provided: [`MemoryStore`] for tests and
//! embedding, and [`SqliteStore`] for standalone persistence.
//!
//! # Examples
//!
//! ```
//! use pagetree::store::{DocumentStore, MemoryStore};
//! use pagetree::{Node, NodeId, Slug};
//!
//! let store = MemoryStore::new();
//! let node = Node::builder(
//!     NodeId::new("root").unwrap(),
//!     Slug::new("home").unwrap(),
//! )
//! .build();
//! store.insert(&node).unwrap();
//!
//! let loaded = store.get(&node.id).unwrap().unwrap();
//! assert_eq!(loaded.slug.as_str(), "home");
//! ```

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{default_data_dir, SqliteStore, SqliteStoreConfig};

use crate::error::Result;
use crate::node::{Node, NodeId};

/// The document-store interface consumed by the resolver and propagator.
///
/// Every mutation is an atomic single-document update; no transaction ever
/// spans a cascade. Implementations are shared across threads (the cascade
/// worker holds its own handle), hence the `Send + Sync` bound.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    /// Fetches a node by id. `Ok(None)` means the node does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on store-level failure.
    fn get(&self, id: &NodeId) -> Result<Option<Node>>;

    /// Fetches the direct children of a node (single-level query).
    ///
    /// # Errors
    ///
    /// Returns an error on store-level failure.
    fn children_of(&self, id: &NodeId) -> Result<Vec<Node>>;

    /// Inserts a new node, or replaces an existing node with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error on store-level failure.
    fn insert(&self, node: &Node) -> Result<()>;

    /// Updates only the denormalized `url` field of a node, bumping its
    /// `updated_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the node does
    /// not exist, or an error on store-level failure.
    fn set_url(&self, id: &NodeId, url: &str) -> Result<()>;

    /// Updates only the `parent` reference of a node, bumping its
    /// `updated_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the node does
    /// not exist, or an error on store-level failure.
    fn set_parent(&self, id: &NodeId, parent: Option<NodeId>) -> Result<()>;
}
