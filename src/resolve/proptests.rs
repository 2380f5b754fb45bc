//! Property-based tests for path resolution.

use std::sync::Arc;

use proptest::prelude::*;

use crate::node::{Node, NodeId, Slug};
use crate::store::{DocumentStore, MemoryStore};

use super::resolver::{HierarchyPathResolver, ResolveOptions};
use super::rules::RouteRules;

/// Strategy generating a random acyclic chain of slugs, root first.
fn chain_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..=10)
}

/// Builds a straight-line tree from the slugs; returns the store and the
/// leaf id.
fn build_chain(slugs: &[String]) -> (Arc<MemoryStore>, NodeId) {
    let store = Arc::new(MemoryStore::new());
    let mut parent: Option<NodeId> = None;
    let mut leaf = NodeId::new("unset").unwrap();
    for (i, slug) in slugs.iter().enumerate() {
        let id = NodeId::new(format!("n{i}")).unwrap();
        let mut builder = Node::builder(id.clone(), Slug::new(slug.clone()).unwrap());
        if let Some(p) = parent.clone() {
            builder = builder.parent(p);
        }
        store.insert(&builder.build()).unwrap();
        parent = Some(id.clone());
        leaf = id;
    }
    (store, leaf)
}

proptest! {
    /// Resolution of any acyclic chain terminates and matches the manual
    /// walk of parent references.
    #[test]
    fn resolve_matches_manual_walk(slugs in chain_strategy()) {
        let (store, leaf) = build_chain(&slugs);
        let resolver = HierarchyPathResolver::new(store, RouteRules::default());
        let path = resolver.resolve(&leaf, &ResolveOptions::new()).unwrap();

        let expected: Vec<&str> = slugs
            .iter()
            .enumerate()
            .filter(|(i, slug)| !(*i == 0 && slug.as_str() == "home"))
            .map(|(_, slug)| slug.as_str())
            .collect();
        prop_assert_eq!(path, RouteRules::join(&expected));
    }

    /// Resolved paths always start with `/` and never contain `//`.
    #[test]
    fn resolved_paths_are_well_formed(slugs in chain_strategy()) {
        let (store, leaf) = build_chain(&slugs);
        let resolver = HierarchyPathResolver::new(store, RouteRules::default());
        let path = resolver.resolve(&leaf, &ResolveOptions::new()).unwrap();
        prop_assert!(path.starts_with('/'));
        prop_assert!(!path.contains("//"));
    }

    /// Resolving twice without tree mutation yields the same string,
    /// with and without the cache.
    #[test]
    fn resolve_is_idempotent(slugs in chain_strategy(), use_cache in any::<bool>()) {
        let (store, leaf) = build_chain(&slugs);
        let resolver = HierarchyPathResolver::new(store, RouteRules::default());
        let options = ResolveOptions::new().with_cache(use_cache);
        let first = resolver.resolve(&leaf, &options).unwrap();
        let second = resolver.resolve(&leaf, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A chain longer than the depth ceiling always trips the fuse.
    #[test]
    fn depth_fuse_always_fires(extra in 1usize..5) {
        let max_depth = 4;
        let slugs: Vec<String> = (0..max_depth + extra).map(|i| format!("s{i}")).collect();
        let (store, leaf) = build_chain(&slugs);
        let resolver = HierarchyPathResolver::new(store, RouteRules::default());
        let options = ResolveOptions::new().with_max_depth(max_depth);
        let err = resolver.resolve(&leaf, &options).unwrap_err();
        prop_assert!(err.is_depth_exceeded());
    }
}
