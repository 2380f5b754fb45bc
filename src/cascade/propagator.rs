//! Recursive descendant URL regeneration.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::resolve::{HierarchyPathResolver, ResolveOptions};
use crate::store::DocumentStore;

/// Terminal state of one cascade run.
///
/// A run moves `Scheduled -> Running -> {Completed, PartiallyFailed}`; the
/// first two states live inside the worker, only the terminal ones appear
/// in a report. There is no cancelled state: a scheduled cascade cannot be
/// withdrawn once queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStatus {
    /// Every reachable descendant was updated.
    Completed,
    /// At least one descendant failed; its siblings were still processed.
    PartiallyFailed,
}

/// One descendant that could not be updated.
#[derive(Debug)]
pub struct CascadeFailure {
    /// The descendant whose update failed.
    pub id: NodeId,
    /// The failure, wrapped as [`Error::CascadeChild`].
    pub error: Error,
}

/// Outcome of one cascade run.
///
/// # Examples
///
/// ```
/// use pagetree::cascade::{CascadeReport, CascadeStatus};
///
/// fn summarize(report: &CascadeReport) -> String {
///     format!("{} URLs updated, {} failures", report.updated, report.failures.len())
/// }
/// ```
#[derive(Debug)]
pub struct CascadeReport {
    /// The node whose change triggered the cascade.
    pub origin: NodeId,
    /// Terminal status of the run.
    pub status: CascadeStatus,
    /// Number of descendant URLs rewritten.
    pub updated: usize,
    /// Per-descendant failures, in visit order.
    pub failures: Vec<CascadeFailure>,
    /// Whether the depth ceiling cut the walk short anywhere.
    pub depth_limited: bool,
}

impl CascadeReport {
    fn new(origin: NodeId) -> Self {
        Self {
            origin,
            status: CascadeStatus::Completed,
            updated: 0,
            failures: Vec::new(),
            depth_limited: false,
        }
    }

    fn finish(mut self) -> Self {
        if !self.failures.is_empty() || self.depth_limited {
            self.status = CascadeStatus::PartiallyFailed;
        }
        self
    }
}

/// Recomputes and persists descendant URLs after a hierarchy change.
///
/// The cascade is depth-first and sequential: a child's URL is recomputed
/// only after its parent's new state is already committed, so within one
/// run parent-before-children ordering holds. Per-child failures are
/// recorded and skipped past; the cascade is best-effort by design and a
/// partial outcome is accepted.
///
/// Writes go through [`DocumentStore::set_url`], which can never re-enter
/// the hook layer; the hook-level re-entrancy flags exist for hosts that
/// route cascade writes through their own full update lifecycle.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagetree::cascade::ChildUrlPropagator;
/// use pagetree::resolve::{HierarchyPathResolver, RouteRules};
/// use pagetree::store::{DocumentStore, MemoryStore};
/// use pagetree::{Node, NodeId, Slug};
///
/// let store = Arc::new(MemoryStore::new());
/// let root = Node::builder(NodeId::new("r").unwrap(), Slug::new("home").unwrap()).build();
/// store.insert(&root).unwrap();
///
/// let resolver = Arc::new(HierarchyPathResolver::new(
///     store.clone() as Arc<dyn DocumentStore>,
///     RouteRules::default(),
/// ));
/// let propagator = ChildUrlPropagator::new(store, resolver, 10);
/// let report = propagator.propagate(&root.id).unwrap();
/// assert_eq!(report.updated, 0);
/// ```
pub struct ChildUrlPropagator {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<HierarchyPathResolver>,
    max_depth: usize,
    resolve_options: ResolveOptions,
}

impl ChildUrlPropagator {
    /// Creates a propagator with the given cascade depth ceiling.
    ///
    /// Cascade resolutions include drafts by default: a draft child's
    /// stored URL should be ready the moment it is published.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<HierarchyPathResolver>,
        max_depth: usize,
    ) -> Self {
        Self {
            store,
            resolver,
            max_depth,
            resolve_options: ResolveOptions::new().with_include_drafts(true),
        }
    }

    /// Replaces the options used for per-child resolutions.
    #[must_use]
    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve_options = options;
        self
    }

    /// Regenerates URLs for every transitive descendant of `node_id`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the direct children of `node_id` itself
    /// cannot be listed. Deeper failures are recorded in the report.
    pub fn propagate(&self, node_id: &NodeId) -> Result<CascadeReport> {
        let mut report = CascadeReport::new(node_id.clone());
        log::debug!("cascade starting at {node_id}");
        self.propagate_level(node_id, 1, &mut report)?;
        let report = report.finish();
        log::debug!(
            "cascade from {} finished: {} updated, {} failed",
            report.origin,
            report.updated,
            report.failures.len()
        );
        Ok(report)
    }

    fn propagate_level(
        &self,
        node_id: &NodeId,
        depth: usize,
        report: &mut CascadeReport,
    ) -> Result<()> {
        // Hard ceiling guarantees termination even if the acyclicity
        // invariant is ever violated.
        if depth > self.max_depth {
            log::warn!("cascade from {} cut off at depth {depth}", report.origin);
            report.depth_limited = true;
            return Ok(());
        }

        let children = self.store.children_of(node_id)?;
        for child in children {
            match self.update_child(&child.id) {
                Ok(()) => {
                    report.updated += 1;
                    // Children are processed only after their own parent's
                    // URL is committed.
                    if let Err(error) = self.propagate_level(&child.id, depth + 1, report) {
                        report.failures.push(CascadeFailure {
                            id: child.id.clone(),
                            error: Error::CascadeChild {
                                id: child.id.clone(),
                                source: Box::new(error),
                            },
                        });
                    }
                }
                Err(error) => {
                    // A failed child does not abort its siblings, but its
                    // subtree is skipped for this run; the next cascade
                    // touching this limb picks it up.
                    log::warn!("cascade update failed for {}: {error}", child.id);
                    report.failures.push(CascadeFailure {
                        id: child.id.clone(),
                        error: Error::CascadeChild {
                            id: child.id.clone(),
                            source: Box::new(error),
                        },
                    });
                }
            }
        }
        Ok(())
    }

    fn update_child(&self, id: &NodeId) -> Result<()> {
        let url = self.resolver.resolve(id, &self.resolve_options)?;
        self.store.set_url(id, &url)?;
        self.resolver.cache().invalidate(id);
        Ok(())
    }
}
