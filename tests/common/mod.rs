//! Shared helpers for integration tests.
//!
//! Not every suite uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use pagetree::store::{DocumentStore, MemoryStore};
use pagetree::{Node, NodeId, PageType, Slug, Status};

/// Shorthand node id constructor.
pub fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

/// Builds a published node with the given id, slug, and optional parent.
pub fn node(node_id: &str, slug: &str, parent: Option<&str>) -> Node {
    let mut builder = Node::builder(id(node_id), Slug::new(slug).unwrap());
    if let Some(parent) = parent {
        builder = builder.parent(id(parent));
    }
    builder.build()
}

/// Builds a node with an explicit page type.
pub fn typed_node(node_id: &str, slug: &str, parent: Option<&str>, page_type: PageType) -> Node {
    let mut built = node(node_id, slug, parent);
    built.page_type = page_type;
    built
}

/// Builds a draft node.
pub fn draft_node(node_id: &str, slug: &str, parent: Option<&str>) -> Node {
    let mut built = node(node_id, slug, parent);
    built.status = Status::Draft;
    built
}

/// Seeds the canonical example tree:
/// `root(slug="home") -> a(slug="products") -> b(slug="widgets")`.
pub fn example_tree() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert(&node("root", "home", None)).unwrap();
    store.insert(&node("a", "products", Some("root"))).unwrap();
    store.insert(&node("b", "widgets", Some("a"))).unwrap();
    store
}
