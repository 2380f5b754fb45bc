//! Descendant URL propagation.
//!
//! When a node's hierarchy-relevant fields change, every transitive
//! descendant's denormalized URL goes stale. [`ChildUrlPropagator`] walks
//! the subtree and rewrites those URLs best-effort;
//! [`CascadeWorker`] defers that walk to a background thread behind a
//! bounded queue so the triggering save is never held up.

mod propagator;
mod worker;

pub use propagator::{CascadeFailure, CascadeReport, CascadeStatus, ChildUrlPropagator};
pub use worker::CascadeWorker;
