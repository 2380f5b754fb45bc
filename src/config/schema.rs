//! Configuration schema, defaults, and validation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{PageType, Slug};

/// Default maximum ancestor-walk length.
const DEFAULT_MAX_RESOLVE_DEPTH: usize = 20;

/// Default maximum descendant-cascade depth.
const DEFAULT_MAX_CASCADE_DEPTH: usize = 10;

/// Default bounded cascade queue capacity.
const DEFAULT_CASCADE_QUEUE_CAPACITY: usize = 64;

/// Routing and traversal configuration.
///
/// # Examples
///
/// ```
/// use pagetree::config::Config;
/// use pagetree::PageType;
///
/// let config = Config::default();
/// assert_eq!(config.home_slug.as_str(), "home");
/// assert_eq!(config.route_prefixes.get(&PageType::Blog).unwrap(), "blogs");
/// assert!(config.route_prefixes.get(&PageType::Page).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The root slug that contributes an empty URL segment.
    pub home_slug: Slug,

    /// Page-type routing prefixes. A leaf whose type has an entry here
    /// routes as `/{prefix}/{slug}` instead of through the hierarchy.
    /// `PageType::Page` deliberately has no entry.
    pub route_prefixes: BTreeMap<PageType, String>,

    /// Ceiling on ancestor-walk length during resolution.
    pub max_resolve_depth: usize,

    /// Ceiling on descendant recursion during a cascade.
    pub max_cascade_depth: usize,

    /// Capacity of the bounded cascade scheduling queue.
    pub cascade_queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        let mut route_prefixes = BTreeMap::new();
        route_prefixes.insert(PageType::Blog, "blogs".to_string());
        route_prefixes.insert(PageType::Service, "services".to_string());
        route_prefixes.insert(PageType::Legal, "legal".to_string());
        route_prefixes.insert(PageType::Contact, "contact".to_string());

        Self {
            home_slug: Slug::new("home").expect("default home slug is valid"),
            route_prefixes,
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            cascade_queue_capacity: DEFAULT_CASCADE_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any depth or capacity is zero, or if a
    /// route prefix is empty or contains `/`.
    pub fn validate(&self) -> Result<()> {
        if self.max_resolve_depth == 0 {
            return Err(Error::Validation {
                field: "max_resolve_depth".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.max_cascade_depth == 0 {
            return Err(Error::Validation {
                field: "max_cascade_depth".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.cascade_queue_capacity == 0 {
            return Err(Error::Validation {
                field: "cascade_queue_capacity".into(),
                message: "must be at least 1".into(),
            });
        }
        for (page_type, prefix) in &self.route_prefixes {
            if prefix.is_empty() || prefix.contains('/') {
                return Err(Error::Validation {
                    field: "route_prefixes".into(),
                    message: format!("prefix for '{page_type}' must be a single non-empty segment"),
                });
            }
        }
        Ok(())
    }

    /// Loads a configuration from a YAML file, without environment or
    /// programmatic layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder merging configuration sources in precedence order.
///
/// # Examples
///
/// ```
/// use pagetree::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .max_cascade_depth(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_cascade_depth, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    use_environment: bool,
    home_slug: Option<String>,
    route_prefixes: Option<BTreeMap<PageType, String>>,
    max_resolve_depth: Option<usize>,
    max_cascade_depth: Option<usize>,
    cascade_queue_capacity: Option<usize>,
}

impl ConfigBuilder {
    /// Creates a builder with no layers beyond the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers a YAML configuration file over the defaults.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Layers `PAGETREE_*` environment variables over the file layer.
    #[must_use]
    pub fn with_environment(mut self) -> Self {
        self.use_environment = true;
        self
    }

    /// Overrides the home slug.
    ///
    /// Validation is deferred to [`Self::build`], keeping the builder chain
    /// fallible in exactly one place.
    #[must_use]
    pub fn home_slug(mut self, slug: impl Into<String>) -> Self {
        self.home_slug = Some(slug.into());
        self
    }

    /// Overrides the page-type routing prefixes wholesale.
    #[must_use]
    pub fn route_prefixes(mut self, prefixes: BTreeMap<PageType, String>) -> Self {
        self.route_prefixes = Some(prefixes);
        self
    }

    /// Overrides the ancestor-walk depth ceiling.
    #[must_use]
    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = Some(depth);
        self
    }

    /// Overrides the cascade depth ceiling.
    #[must_use]
    pub fn max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = Some(depth);
        self
    }

    /// Overrides the cascade queue capacity.
    #[must_use]
    pub fn cascade_queue_capacity(mut self, capacity: usize) -> Self {
        self.cascade_queue_capacity = Some(capacity);
        self
    }

    /// Builds the merged, validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file layer fails to load, an environment
    /// value fails to parse, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = match &self.file {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };

        if self.use_environment {
            super::environment::apply_environment(&mut config)?;
        }

        if let Some(slug) = self.home_slug {
            config.home_slug = Slug::new(slug).map_err(Error::from)?;
        }
        if let Some(prefixes) = self.route_prefixes {
            config.route_prefixes = prefixes;
        }
        if let Some(depth) = self.max_resolve_depth {
            config.max_resolve_depth = depth;
        }
        if let Some(depth) = self.max_cascade_depth {
            config.max_cascade_depth = depth;
        }
        if let Some(capacity) = self.cascade_queue_capacity {
            config.cascade_queue_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_prefixes() {
        let config = Config::default();
        assert_eq!(config.route_prefixes.get(&PageType::Blog).unwrap(), "blogs");
        assert_eq!(
            config.route_prefixes.get(&PageType::Service).unwrap(),
            "services"
        );
        assert!(!config.route_prefixes.contains_key(&PageType::Page));
    }

    #[test]
    fn test_validate_rejects_zero_depths() {
        let mut config = Config::default();
        config.max_resolve_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_cascade_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cascade_queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut config = Config::default();
        config
            .route_prefixes
            .insert(PageType::Blog, "a/b".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.route_prefixes.insert(PageType::Blog, String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .home_slug("start")
            .max_resolve_depth(7)
            .max_cascade_depth(3)
            .cascade_queue_capacity(8)
            .build()
            .unwrap();
        assert_eq!(config.home_slug.as_str(), "start");
        assert_eq!(config.max_resolve_depth, 7);
        assert_eq!(config.max_cascade_depth, 3);
        assert_eq!(config.cascade_queue_capacity, 8);
    }

    #[test]
    fn test_yaml_file_layer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "home_slug: start\nmax_resolve_depth: 5\nroute_prefixes:\n  blog: journal"
        )
        .unwrap();

        let config = ConfigBuilder::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.home_slug.as_str(), "start");
        assert_eq!(config.max_resolve_depth, 5);
        assert_eq!(
            config.route_prefixes.get(&PageType::Blog).unwrap(),
            "journal"
        );
        // Unspecified fields keep their defaults.
        assert_eq!(config.max_cascade_depth, 10);
    }

    #[test]
    fn test_yaml_file_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "home_slug: start\nbogus_field: 1").unwrap();
        assert!(Config::from_yaml_file(file.path()).is_err());
    }

    #[test]
    fn test_programmatic_override_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_resolve_depth: 5").unwrap();

        let config = ConfigBuilder::new()
            .with_file(file.path())
            .max_resolve_depth(9)
            .build()
            .unwrap();
        assert_eq!(config.max_resolve_depth, 9);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
