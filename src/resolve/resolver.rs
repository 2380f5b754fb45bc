//! The ancestor-walking path resolver.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::store::DocumentStore;

use super::cache::ResolveCache;
use super::rules::RouteRules;

/// Options controlling a single resolution.
///
/// # Examples
///
/// ```
/// use pagetree::resolve::ResolveOptions;
///
/// let options = ResolveOptions::new()
///     .with_include_drafts(true)
///     .with_max_depth(8);
/// assert!(options.include_drafts());
/// assert_eq!(options.max_depth(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    include_drafts: bool,
    max_depth: usize,
    use_cache: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_drafts: false,
            max_depth: 20,
            use_cache: false,
        }
    }
}

impl ResolveOptions {
    /// Creates options with the defaults: published-only, depth 20, no
    /// cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether ancestor lookups may return draft nodes.
    ///
    /// Needed in admin and preview contexts; public resolution treats a
    /// draft ancestor as missing.
    #[must_use]
    pub fn with_include_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    /// Ceiling on the ancestor-walk length.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether to consult and populate the resolver's cache.
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Returns whether drafts are included.
    #[must_use]
    pub fn include_drafts(&self) -> bool {
        self.include_drafts
    }

    /// Returns the depth ceiling.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns whether the cache is consulted.
    #[must_use]
    pub fn use_cache(&self) -> bool {
        self.use_cache
    }
}

/// Computes a node's externally visible URL from its position in the tree.
///
/// Resolution walks `parent` references from the node to its root, joins
/// the slugs, and applies the [`RouteRules`]: the home root contributes an
/// empty segment, and a leaf whose page type has a routing prefix routes as
/// `/{prefix}/{slug}` without consulting the hierarchy.
///
/// Failure is total: an error on any ancestor fails the whole resolution
/// rather than producing a partial path.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagetree::resolve::{HierarchyPathResolver, ResolveOptions, RouteRules};
/// use pagetree::store::{DocumentStore, MemoryStore};
/// use pagetree::{Node, NodeId, Slug};
///
/// let store = Arc::new(MemoryStore::new());
/// let root = Node::builder(NodeId::new("r").unwrap(), Slug::new("home").unwrap()).build();
/// store.insert(&root).unwrap();
///
/// let resolver = HierarchyPathResolver::new(store, RouteRules::default());
/// let path = resolver.resolve(&root.id, &ResolveOptions::new()).unwrap();
/// assert_eq!(path, "/");
/// ```
pub struct HierarchyPathResolver {
    store: Arc<dyn DocumentStore>,
    rules: RouteRules,
    cache: ResolveCache,
}

impl HierarchyPathResolver {
    /// Creates a resolver over the given store and rules.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, rules: RouteRules) -> Self {
        Self {
            store,
            rules,
            cache: ResolveCache::new(),
        }
    }

    /// The resolver's routing rules.
    #[must_use]
    pub fn rules(&self) -> &RouteRules {
        &self.rules
    }

    /// The resolution cache.
    ///
    /// The cache holds published-only resolutions; draft-inclusive calls
    /// bypass it entirely so a preview path can never leak into public
    /// resolution.
    #[must_use]
    pub fn cache(&self) -> &ResolveCache {
        &self.cache
    }

    /// Resolves the URL path for `node_id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the node or any ancestor is missing, or is
    ///   a draft while `include_drafts` is off.
    /// - [`Error::DepthExceeded`] if the ancestor chain exceeds
    ///   `options.max_depth`.
    /// - [`Error::Resolution`] wrapping any store-level failure.
    pub fn resolve(&self, node_id: &NodeId, options: &ResolveOptions) -> Result<String> {
        let cacheable = options.use_cache() && !options.include_drafts();
        if cacheable {
            if let Some(hit) = self.cache.get(node_id) {
                log::debug!("resolve cache hit for {node_id}: {hit}");
                return Ok(hit);
            }
        }

        let path = self
            .resolve_uncached(node_id, options)
            .map_err(|e| e.into_resolution(node_id.clone()))?;

        if cacheable {
            self.cache.put(node_id.clone(), path.clone());
        }
        Ok(path)
    }

    /// Resolves the URL for a node value that may not yet be persisted.
    ///
    /// The leaf is taken as given (its own status is not filtered); only
    /// its ancestors are looked up in the store. Used by the before-change
    /// hook, where the saved document is not committed yet. Never consults
    /// or populates the cache.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::resolve`], for the ancestor chain.
    pub fn resolve_node(&self, leaf: &Node, options: &ResolveOptions) -> Result<String> {
        let id = leaf.id.clone();
        self.resolve_from(leaf.clone(), options)
            .map_err(|e| e.into_resolution(id))
    }

    fn resolve_uncached(&self, node_id: &NodeId, options: &ResolveOptions) -> Result<String> {
        let leaf = self.fetch(node_id, options)?;
        self.resolve_from(leaf, options)
    }

    fn resolve_from(&self, leaf: Node, options: &ResolveOptions) -> Result<String> {
        let node_id = leaf.id.clone();

        // A typed leaf routes by prefix alone; ancestors contribute path
        // segments only for plain pages.
        if let Some(prefix) = self.rules.prefix_for(leaf.page_type) {
            return Ok(format!("/{prefix}/{}", leaf.slug));
        }

        // Collect the chain leaf-to-root.
        let mut chain: Vec<Node> = vec![leaf];
        while let Some(parent_id) = chain.last().and_then(|n| n.parent.clone()) {
            if chain.len() >= options.max_depth() {
                return Err(Error::DepthExceeded {
                    id: node_id.clone(),
                    max_depth: options.max_depth(),
                });
            }
            let parent = self.fetch(&parent_id, options)?;
            chain.push(parent);
        }

        let root_is_home = chain.last().is_some_and(|root| self.rules.is_home(root));

        let segments: Vec<&str> = chain
            .iter()
            .rev()
            .enumerate()
            .filter(|(i, _)| !(*i == 0 && root_is_home))
            .map(|(_, node)| node.slug.as_str())
            .collect();

        Ok(RouteRules::join(&segments))
    }

    fn fetch(&self, id: &NodeId, options: &ResolveOptions) -> Result<Node> {
        let node = self
            .store
            .get(id)?
            .ok_or_else(|| Error::NotFound { id: id.clone() })?;
        if !options.include_drafts() && node.status == crate::node::Status::Draft {
            return Err(Error::NotFound { id: id.clone() });
        }
        Ok(node)
    }
}
