//! The lifecycle-hook surface exposed to the host CMS.
//!
//! The host wires two calls into its document lifecycle:
//! [`UrlHooks::generate_url`] before a document commits (attaching the
//! denormalized `url`), and [`UrlHooks::regenerate_descendants`] after an
//! update (scheduling the descendant cascade). Both are best-effort: URL
//! bookkeeping never fails a user's save.
//!
//! Everything the calls need travels in an explicit [`HookContext`] rather
//! than ambient state, including the re-entrancy flags that keep a
//! cascade-issued update from re-triggering its own originating hook.

use std::sync::Arc;

use crate::cascade::{CascadeReport, CascadeWorker, ChildUrlPropagator};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::node::{hierarchy_fields_changed, Node, NodeId};
use crate::resolve::{HierarchyPathResolver, ResolveOptions, RouteRules};
use crate::store::DocumentStore;

/// The document operation a hook fires for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A new document is being created.
    Create,
    /// An existing document is being updated.
    Update,
}

/// Per-call context threaded through every hook invocation.
///
/// # Examples
///
/// ```
/// use pagetree::hooks::HookContext;
///
/// let ctx = HookContext::update();
/// assert!(!ctx.skip_url_generation);
///
/// let cascade_ctx = HookContext::update().suppressing_reentry();
/// assert!(cascade_ctx.skip_url_generation);
/// assert!(cascade_ctx.skip_child_url_regeneration);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HookContext {
    /// The operation the hooks fire for.
    pub operation: Operation,
    /// Suppresses URL generation for this write.
    pub skip_url_generation: bool,
    /// Suppresses cascade scheduling for this write.
    pub skip_child_url_regeneration: bool,
}

impl HookContext {
    /// Context for a create operation.
    #[must_use]
    pub fn create() -> Self {
        Self {
            operation: Operation::Create,
            skip_url_generation: false,
            skip_child_url_regeneration: false,
        }
    }

    /// Context for an update operation.
    #[must_use]
    pub fn update() -> Self {
        Self {
            operation: Operation::Update,
            skip_url_generation: false,
            skip_child_url_regeneration: false,
        }
    }

    /// Marks the context as originating from a cascade write, so neither
    /// hook fires again for it.
    #[must_use]
    pub fn suppressing_reentry(mut self) -> Self {
        self.skip_url_generation = true;
        self.skip_child_url_regeneration = true;
        self
    }
}

/// The wired-up hook surface: resolver, propagator, and cascade worker.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagetree::config::Config;
/// use pagetree::hooks::{HookContext, UrlHooks};
/// use pagetree::store::{DocumentStore, MemoryStore};
/// use pagetree::{Node, NodeId, Slug};
///
/// let store = Arc::new(MemoryStore::new());
/// let hooks = UrlHooks::new(store.clone(), &Config::default());
///
/// let mut node = Node::builder(
///     NodeId::new("r").unwrap(),
///     Slug::new("home").unwrap(),
/// )
/// .build();
/// assert!(hooks.generate_url(&HookContext::create(), &mut node));
/// assert_eq!(node.url.as_deref(), Some("/"));
/// store.insert(&node).unwrap();
/// ```
pub struct UrlHooks {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<HierarchyPathResolver>,
    worker: CascadeWorker,
    max_resolve_depth: usize,
}

impl UrlHooks {
    /// Wires the hook surface over a store, per the configuration.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let rules = RouteRules::from_config(config);
        let resolver = Arc::new(HierarchyPathResolver::new(Arc::clone(&store), rules));
        let propagator = ChildUrlPropagator::new(
            Arc::clone(&store),
            Arc::clone(&resolver),
            config.max_cascade_depth,
        )
        .with_resolve_options(
            ResolveOptions::new()
                .with_include_drafts(true)
                .with_max_depth(config.max_resolve_depth),
        );
        let worker = CascadeWorker::spawn(propagator, config.cascade_queue_capacity);

        Self {
            store,
            resolver,
            worker,
            max_resolve_depth: config.max_resolve_depth,
        }
    }

    /// The resolver backing this hook surface, for direct read-path use.
    #[must_use]
    pub fn resolver(&self) -> &HierarchyPathResolver {
        &self.resolver
    }

    /// Before-change hook: computes and attaches `node.url`.
    ///
    /// Returns whether a fresh URL was attached. A resolution failure is
    /// logged and reported as `false`; the document save proceeds with the
    /// previous (possibly stale) URL rather than failing the user's edit.
    pub fn generate_url(&self, ctx: &HookContext, node: &mut Node) -> bool {
        if ctx.skip_url_generation {
            return false;
        }

        let options = ResolveOptions::new()
            .with_include_drafts(true)
            .with_max_depth(self.max_resolve_depth);
        match self.resolver.resolve_node(node, &options) {
            Ok(url) => {
                node.url = Some(url);
                // The stored value for this node is about to change.
                self.resolver.cache().invalidate(&node.id);
                true
            }
            Err(error) => {
                log::error!("url generation failed for {}: {error}", node.id);
                false
            }
        }
    }

    /// After-change hook: schedules the descendant cascade when a
    /// hierarchy-relevant field changed.
    ///
    /// Returns whether a cascade was scheduled. Fires only for updates;
    /// honors the re-entrancy flag; a full queue or dead worker is logged
    /// and swallowed, keeping the cascade best-effort.
    pub fn regenerate_descendants(
        &self,
        ctx: &HookContext,
        previous: &Node,
        current: &Node,
    ) -> bool {
        if ctx.skip_child_url_regeneration || ctx.operation != Operation::Update {
            return false;
        }
        if !hierarchy_fields_changed(previous, current) {
            return false;
        }

        if previous.parent == current.parent {
            self.resolver.cache().invalidate(&current.id);
        } else {
            // A reparent moves an arbitrary subtree; every cached path
            // below either position may be stale.
            self.resolver.cache().clear();
        }

        match self.worker.schedule(current.id.clone()) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("cascade not scheduled for {}: {error}", current.id);
                false
            }
        }
    }

    /// Rejects a parent change that would make `id` its own ancestor.
    ///
    /// The depth fuse remains the runtime backstop; this check lets hosts
    /// fail the write instead of persisting a cycle.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the new parent chain passes through `id`.
    /// - [`Error::NotFound`] if an ancestor on the new chain is missing.
    /// - [`Error::DepthExceeded`] if the new chain already exceeds the
    ///   resolve depth ceiling.
    pub fn validate_parent_change(&self, id: &NodeId, new_parent: Option<&NodeId>) -> Result<()> {
        let Some(parent_id) = new_parent else {
            return Ok(());
        };

        let mut current = parent_id.clone();
        for _ in 0..self.max_resolve_depth {
            if current == *id {
                return Err(Error::Validation {
                    field: "parent".to_string(),
                    message: format!("setting parent {parent_id} would make {id} its own ancestor"),
                });
            }
            let node = self
                .store
                .get(&current)?
                .ok_or_else(|| Error::NotFound { id: current.clone() })?;
            match node.parent {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }
        Err(Error::DepthExceeded {
            id: id.clone(),
            max_depth: self.max_resolve_depth,
        })
    }

    /// Stops the cascade worker, draining pending jobs, and returns the
    /// reports of every run.
    #[must_use]
    pub fn shutdown(self) -> Vec<CascadeReport> {
        self.worker.shutdown()
    }
}
