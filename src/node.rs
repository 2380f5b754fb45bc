//! Node types for the page hierarchy.
//!
//! This module provides the document types participating in the parent/child
//! page tree, including validated identifier and slug newtypes and a builder
//! for constructing nodes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a node.
///
/// Identifiers are opaque strings assigned by the host CMS. They must be
/// non-empty after trimming whitespace.
///
/// # Examples
///
/// ```
/// use pagetree::NodeId;
///
/// let id = NodeId::new("page-42").unwrap();
/// assert_eq!(format!("{id}"), "page-42");
///
/// assert!(NodeId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl TryFrom<String> for NodeId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl NodeId {
    /// Creates a new node identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty after trimming whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "id".into(),
                message: "identifier must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A URL path segment.
///
/// Slugs are unique only among siblings, not globally. Valid slugs consist
/// of lowercase ASCII alphanumerics, `-`, and `_`.
///
/// # Examples
///
/// ```
/// use pagetree::Slug;
///
/// let slug = Slug::new("managed-services").unwrap();
/// assert_eq!(slug.as_str(), "managed-services");
///
/// assert!(Slug::new("Has Spaces").is_err());
/// assert!(Slug::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl TryFrom<String> for Slug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl Slug {
    /// Creates a new slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is empty or contains characters other
    /// than lowercase ASCII alphanumerics, `-`, and `_`.
    pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(ValidationError {
                field: "slug".into(),
                message: "slug must be non-empty".into(),
            });
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ValidationError {
                field: "slug".into(),
                message: format!(
                    "slug '{slug}' may only contain lowercase alphanumerics, '-', and '_'"
                ),
            });
        }
        Ok(Self(slug))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The routing category of a node.
///
/// The page type selects a routing prefix independent of the node's position
/// in the hierarchy. The prefix mapping itself lives in
/// [`Config`](crate::config::Config); `Page` has no prefix and routes
/// hierarchically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    /// A plain page, routed by its position in the hierarchy.
    Page,
    /// A blog entry.
    Blog,
    /// A service page.
    Service,
    /// A legal page (imprint, privacy policy).
    Legal,
    /// A contact page.
    Contact,
}

impl PageType {
    /// All page type variants, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Page,
        Self::Blog,
        Self::Service,
        Self::Legal,
        Self::Contact,
    ];
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Page => "page",
            Self::Blog => "blog",
            Self::Service => "service",
            Self::Legal => "legal",
            Self::Contact => "contact",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PageType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "blog" => Ok(Self::Blog),
            "service" => Ok(Self::Service),
            "legal" => Ok(Self::Legal),
            "contact" => Ok(Self::Contact),
            _ => Err(ValidationError {
                field: "page_type".into(),
                message: format!("unknown page type: {s}"),
            }),
        }
    }
}

/// The publication status of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Not publicly visible; excluded from published-only resolution.
    Draft,
    /// Publicly visible.
    Published,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown status: {s}"),
            }),
        }
    }
}

/// A content document participating in the parent/child hierarchy.
///
/// The `url` field is denormalized: it is always derivable from
/// `(slug, parent chain, page_type)` and is stored only for read
/// performance. It is never treated as a source of truth.
///
/// # Examples
///
/// ```
/// use pagetree::{Node, NodeId, PageType, Slug, Status};
///
/// let node = Node::builder(
///     NodeId::new("products").unwrap(),
///     Slug::new("products").unwrap(),
/// )
/// .page_type(PageType::Page)
/// .status(Status::Published)
/// .build();
///
/// assert!(node.parent.is_none());
/// assert!(node.url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The node's stable identifier.
    pub id: NodeId,
    /// The node's URL path segment, unique among siblings.
    pub slug: Slug,
    /// The parent node, if any. Absence means the node is a root.
    pub parent: Option<NodeId>,
    /// The routing category.
    pub page_type: PageType,
    /// The publication status.
    pub status: Status,
    /// The denormalized, externally visible URL. Never authoritative.
    pub url: Option<String>,
    /// When the node was last written.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Starts building a node with the given identifier and slug.
    ///
    /// Defaults: no parent, `PageType::Page`, `Status::Published`, no URL.
    #[must_use]
    pub fn builder(id: NodeId, slug: Slug) -> NodeBuilder {
        NodeBuilder {
            id,
            slug,
            parent: None,
            page_type: PageType::Page,
            status: Status::Published,
            url: None,
        }
    }

    /// Whether the node is a root (has no parent).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Builder for [`Node`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    id: NodeId,
    slug: Slug,
    parent: Option<NodeId>,
    page_type: PageType,
    status: Status,
    url: Option<String>,
}

impl NodeBuilder {
    /// Sets the parent node.
    #[must_use]
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the routing category.
    #[must_use]
    pub fn page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// Sets the publication status.
    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets a previously computed URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Finishes building the node, stamping `updated_at` with the current
    /// time.
    #[must_use]
    pub fn build(self) -> Node {
        Node {
            id: self.id,
            slug: self.slug,
            parent: self.parent,
            page_type: self.page_type,
            status: self.status,
            url: self.url,
            updated_at: Utc::now(),
        }
    }
}

/// Returns true iff the fields whose change triggers a descendant cascade
/// differ between the two versions of a node.
///
/// The hierarchy-relevant fields are `slug`, `parent`, and `page_type`;
/// nothing else (status flips, URL rewrites, content edits) triggers a
/// cascade.
///
/// # Examples
///
/// ```
/// use pagetree::{hierarchy_fields_changed, Node, NodeId, Slug};
///
/// let old = Node::builder(NodeId::new("a").unwrap(), Slug::new("old").unwrap()).build();
/// let mut new = old.clone();
/// assert!(!hierarchy_fields_changed(&old, &new));
///
/// new.slug = Slug::new("new").unwrap();
/// assert!(hierarchy_fields_changed(&old, &new));
/// ```
#[must_use]
pub fn hierarchy_fields_changed(old: &Node, new: &Node) -> bool {
    old.slug != new.slug || old.parent != new.parent || old.page_type != new.page_type
}

/// A validation failure during node or configuration construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_trims_whitespace() {
        let id = NodeId::new("  page-1  ").unwrap();
        assert_eq!(id.as_str(), "page-1");
    }

    #[test]
    fn test_node_id_rejects_empty() {
        assert!(NodeId::new("").is_err());
        assert!(NodeId::new("   ").is_err());
    }

    #[test]
    fn test_slug_accepts_valid_segments() {
        for s in ["home", "managed-services", "faq_2025", "a1"] {
            assert!(Slug::new(s).is_ok(), "expected {s} to be valid");
        }
    }

    #[test]
    fn test_slug_rejects_invalid_segments() {
        for s in ["", "Has Caps", "spa ce", "a/b", "über", "trailing/"] {
            assert!(Slug::new(s).is_err(), "expected {s} to be rejected");
        }
    }

    #[test]
    fn test_page_type_round_trip() {
        for page_type in PageType::ALL {
            let parsed: PageType = page_type.to_string().parse().unwrap();
            assert_eq!(parsed, page_type);
        }
    }

    #[test]
    fn test_page_type_parse_rejects_unknown() {
        assert!("newsletter".parse::<PageType>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [Status::Draft, Status::Published] {
            let parsed: Status = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_builder_defaults() {
        let node = Node::builder(NodeId::new("n").unwrap(), Slug::new("n").unwrap()).build();
        assert!(node.is_root());
        assert_eq!(node.page_type, PageType::Page);
        assert_eq!(node.status, Status::Published);
        assert!(node.url.is_none());
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let parent = NodeId::new("parent").unwrap();
        let node = Node::builder(NodeId::new("n").unwrap(), Slug::new("n").unwrap())
            .parent(parent.clone())
            .page_type(PageType::Blog)
            .status(Status::Draft)
            .url("/blogs/n")
            .build();
        assert_eq!(node.parent, Some(parent));
        assert_eq!(node.page_type, PageType::Blog);
        assert_eq!(node.status, Status::Draft);
        assert_eq!(node.url.as_deref(), Some("/blogs/n"));
    }

    #[test]
    fn test_hierarchy_fields_changed_on_each_watched_field() {
        let base = Node::builder(NodeId::new("n").unwrap(), Slug::new("n").unwrap()).build();

        let mut slugged = base.clone();
        slugged.slug = Slug::new("renamed").unwrap();
        assert!(hierarchy_fields_changed(&base, &slugged));

        let mut moved = base.clone();
        moved.parent = Some(NodeId::new("elsewhere").unwrap());
        assert!(hierarchy_fields_changed(&base, &moved));

        let mut retyped = base.clone();
        retyped.page_type = PageType::Service;
        assert!(hierarchy_fields_changed(&base, &retyped));
    }

    #[test]
    fn test_hierarchy_fields_ignore_status_and_url() {
        let base = Node::builder(NodeId::new("n").unwrap(), Slug::new("n").unwrap()).build();

        let mut unpublished = base.clone();
        unpublished.status = Status::Draft;
        unpublished.url = Some("/n".to_string());
        assert!(!hierarchy_fields_changed(&base, &unpublished));
    }

    #[test]
    fn test_serde_validates_newtypes() {
        assert!(serde_json::from_str::<Slug>("\"Has Caps\"").is_err());
        assert!(serde_json::from_str::<NodeId>("\"  \"").is_err());
        let slug: Slug = serde_json::from_str("\"widgets\"").unwrap();
        assert_eq!(slug.as_str(), "widgets");
    }

    #[test]
    fn test_node_serde_round_trip() {
        let node = Node::builder(NodeId::new("n").unwrap(), Slug::new("n").unwrap())
            .page_type(PageType::Legal)
            .build();
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
        assert!(json.contains("\"legal\""));
    }
}
