#![deny(unsafe_code)]
// Generated mocks carry no docs, so the lint is scoped to non-test builds.
#![cfg_attr(not(test), deny(missing_docs))]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # pagetree
//!
//! A library for resolving and maintaining hierarchical page URLs.
//!
//! Pages form a self-referencing tree: each node optionally points at a
//! parent, and a node's externally visible URL is derived from its chain of
//! ancestor slugs plus per-type routing rules. This crate computes those
//! URLs, keeps the denormalized `url` field on every descendant consistent
//! when an ancestor moves or is renamed, and exposes the two lifecycle
//! hooks a host CMS wires into its document writes.
//!
//! ## Core Types
//!
//! - [`Node`], [`NodeId`], [`Slug`]: the page tree data model
//! - [`HierarchyPathResolver`]: ancestor walk and routing rules
//! - [`ChildUrlPropagator`] and [`CascadeWorker`]: descendant URL cascade
//! - [`UrlHooks`] and [`HookContext`]: the surface the host calls
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use pagetree::config::Config;
//! use pagetree::hooks::{HookContext, UrlHooks};
//! use pagetree::store::{DocumentStore, MemoryStore};
//! use pagetree::{Node, NodeId, Slug};
//!
//! let store = Arc::new(MemoryStore::new());
//! let hooks = UrlHooks::new(store.clone(), &Config::default());
//!
//! // The before-change hook attaches the computed URL.
//! let mut home = Node::builder(
//!     NodeId::new("root").unwrap(),
//!     Slug::new("home").unwrap(),
//! )
//! .build();
//! hooks.generate_url(&HookContext::create(), &mut home);
//! assert_eq!(home.url.as_deref(), Some("/"));
//! store.insert(&home).unwrap();
//! ```

pub mod cascade;
pub mod config;
pub mod error;
pub mod hooks;
pub mod node;
pub mod resolve;
pub mod store;

// Re-export key types at crate root for convenience
pub use cascade::{CascadeReport, CascadeStatus, CascadeWorker, ChildUrlPropagator};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use hooks::{HookContext, Operation, UrlHooks};
pub use node::{hierarchy_fields_changed, Node, NodeId, PageType, Slug, Status};
pub use resolve::{HierarchyPathResolver, ResolveOptions};
pub use store::{DocumentStore, MemoryStore, SqliteStore, SqliteStoreConfig};
