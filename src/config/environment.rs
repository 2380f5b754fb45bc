//! Environment variable overrides for configuration.
//!
//! Recognized variables:
//!
//! - `PAGETREE_HOME_SLUG`
//! - `PAGETREE_MAX_RESOLVE_DEPTH`
//! - `PAGETREE_MAX_CASCADE_DEPTH`
//! - `PAGETREE_CASCADE_QUEUE_CAPACITY`
//!
//! Route prefixes are not overridable from the environment; they are a map
//! and belong in the YAML layer or programmatic overrides.

use std::env;

use crate::error::{Error, Result};
use crate::node::Slug;

use super::schema::Config;

/// Environment variable for the home slug.
const ENV_HOME_SLUG: &str = "PAGETREE_HOME_SLUG";
/// Environment variable for the ancestor-walk depth ceiling.
const ENV_MAX_RESOLVE_DEPTH: &str = "PAGETREE_MAX_RESOLVE_DEPTH";
/// Environment variable for the cascade depth ceiling.
const ENV_MAX_CASCADE_DEPTH: &str = "PAGETREE_MAX_CASCADE_DEPTH";
/// Environment variable for the cascade queue capacity.
const ENV_CASCADE_QUEUE_CAPACITY: &str = "PAGETREE_CASCADE_QUEUE_CAPACITY";

/// Applies `PAGETREE_*` environment variables onto `config` in place.
///
/// Unset variables leave the corresponding field untouched. Set-but-invalid
/// values are an error rather than a silent fallback, so a typo in a
/// deployment environment is caught at startup.
///
/// # Errors
///
/// Returns a validation error if a set variable fails to parse.
pub fn apply_environment(config: &mut Config) -> Result<()> {
    if let Ok(value) = env::var(ENV_HOME_SLUG) {
        config.home_slug = Slug::new(value).map_err(Error::from)?;
    }
    if let Some(depth) = parse_usize(ENV_MAX_RESOLVE_DEPTH)? {
        config.max_resolve_depth = depth;
    }
    if let Some(depth) = parse_usize(ENV_MAX_CASCADE_DEPTH)? {
        config.max_cascade_depth = depth;
    }
    if let Some(capacity) = parse_usize(ENV_CASCADE_QUEUE_CAPACITY)? {
        config.cascade_queue_capacity = capacity;
    }
    Ok(())
}

/// Reads an optional usize-valued environment variable.
fn parse_usize(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|_| {
            Error::Validation {
                field: name.to_string(),
                message: format!("expected an unsigned integer, got '{value}'"),
            }
        }),
        Err(_) => Ok(None),
    }
}
