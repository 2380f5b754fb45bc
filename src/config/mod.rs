//! Configuration system for pagetree.
//!
//! Configuration is merged from multiple sources with the following
//! precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`ConfigBuilder`] setters)
//! 2. Environment variables (`PAGETREE_*`)
//! 3. A YAML configuration file (via [`ConfigBuilder::with_file`])
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use pagetree::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .home_slug("start")
//!     .max_resolve_depth(12)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.home_slug.as_str(), "start");
//! assert_eq!(config.max_resolve_depth, 12);
//! ```

mod environment;
mod schema;

pub use environment::apply_environment;
pub use schema::{Config, ConfigBuilder};
