//! Routing rules derived from configuration.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::node::{Node, PageType, Slug};

/// The routing rules applied during path construction.
///
/// Two rules exist:
///
/// - A root node whose slug equals the home slug contributes an empty
///   segment, so the site root resolves to `/` rather than `/home`.
/// - A leaf whose page type has a configured prefix routes as
///   `/{prefix}/{slug}`, independent of its position in the hierarchy.
///   Prefixes apply to the leaf only; ancestors never contribute one.
///
/// # Examples
///
/// ```
/// use pagetree::config::Config;
/// use pagetree::resolve::RouteRules;
/// use pagetree::PageType;
///
/// let rules = RouteRules::from_config(&Config::default());
/// assert_eq!(rules.prefix_for(PageType::Blog), Some("blogs"));
/// assert_eq!(rules.prefix_for(PageType::Page), None);
/// ```
#[derive(Debug, Clone)]
pub struct RouteRules {
    home_slug: Slug,
    prefixes: BTreeMap<PageType, String>,
}

impl RouteRules {
    /// Derives the rules from a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            home_slug: config.home_slug.clone(),
            prefixes: config.route_prefixes.clone(),
        }
    }

    /// The slug that marks the site root.
    #[must_use]
    pub fn home_slug(&self) -> &Slug {
        &self.home_slug
    }

    /// The routing prefix for a page type, if any.
    #[must_use]
    pub fn prefix_for(&self, page_type: PageType) -> Option<&str> {
        self.prefixes.get(&page_type).map(String::as_str)
    }

    /// Whether a node is the designated home node: a root whose slug is the
    /// home slug.
    #[must_use]
    pub fn is_home(&self, node: &Node) -> bool {
        node.is_root() && node.slug == self.home_slug
    }

    /// Joins path segments into an absolute URL.
    ///
    /// Empty segment lists (the home node alone) produce `/`.
    #[must_use]
    pub fn join(segments: &[&str]) -> String {
        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    }
}

impl Default for RouteRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    #[test]
    fn test_default_rules() {
        let rules = RouteRules::default();
        assert_eq!(rules.home_slug().as_str(), "home");
        assert_eq!(rules.prefix_for(PageType::Service), Some("services"));
        assert_eq!(rules.prefix_for(PageType::Page), None);
    }

    #[test]
    fn test_is_home_requires_root_and_home_slug() {
        let rules = RouteRules::default();

        let home = Node::builder(NodeId::new("r").unwrap(), Slug::new("home").unwrap()).build();
        assert!(rules.is_home(&home));

        let other_root =
            Node::builder(NodeId::new("r").unwrap(), Slug::new("about").unwrap()).build();
        assert!(!rules.is_home(&other_root));

        // A non-root node named "home" is not the home node.
        let nested = Node::builder(NodeId::new("n").unwrap(), Slug::new("home").unwrap())
            .parent(NodeId::new("r").unwrap())
            .build();
        assert!(!rules.is_home(&nested));
    }

    #[test]
    fn test_join() {
        assert_eq!(RouteRules::join(&[]), "/");
        assert_eq!(RouteRules::join(&["products"]), "/products");
        assert_eq!(
            RouteRules::join(&["products", "widgets"]),
            "/products/widgets"
        );
    }
}
