//! Hierarchy path resolution.
//!
//! Given a node in the page tree, [`HierarchyPathResolver`] computes its
//! externally visible URL by walking `parent` references to the root,
//! joining slugs, and applying the routing rules (home-slug special case,
//! page-type prefixes).

mod cache;
#[cfg(all(test, feature = "property-tests"))]
mod proptests;
mod resolver;
mod rules;

pub use cache::ResolveCache;
pub use resolver::{HierarchyPathResolver, ResolveOptions};
pub use rules::RouteRules;
