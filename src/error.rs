//! Error types for the pagetree library.
//!
//! This module provides the error hierarchy for path resolution and cascade
//! propagation, using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias for operations that may fail with a pagetree error.
///
/// # Examples
///
/// ```
/// use pagetree::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("/products/widgets".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the pagetree library.
///
/// This enum encompasses all error conditions that can occur during URL
/// resolution and descendant propagation. Nothing here is fatal to the host
/// application: the hook layer catches and logs resolution and cascade
/// failures so a content save never fails on URL bookkeeping alone.
#[derive(Debug, Error)]
pub enum Error {
    /// A node or one of its ancestors does not exist.
    ///
    /// Also raised when a draft ancestor is filtered out of a
    /// published-only resolution.
    #[error("node not found: {id}")]
    NotFound {
        /// The identifier that could not be resolved to a node.
        id: NodeId,
    },

    /// An ancestor walk or descendant cascade exceeded the configured
    /// maximum depth.
    ///
    /// This is a safety fuse against cyclic or runaway trees, not
    /// necessarily a data-integrity bug.
    #[error("depth limit {max_depth} exceeded while traversing from {id}")]
    DepthExceeded {
        /// The node the traversal started from.
        id: NodeId,
        /// The depth ceiling that was hit.
        max_depth: usize,
    },

    /// A store-level failure occurred while computing a path.
    ///
    /// Resolution is all-or-nothing: a failed ancestor lookup fails the
    /// whole path rather than producing a partial one.
    #[error("resolution failed for {id}: {source}")]
    Resolution {
        /// The node whose path was being resolved.
        id: NodeId,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A single descendant's URL update failed during a cascade.
    ///
    /// Cascades are best-effort: this error is recorded per child and does
    /// not abort sibling subtrees.
    #[error("cascade update failed for child {id}: {source}")]
    CascadeChild {
        /// The child whose update failed.
        id: NodeId,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The bounded cascade scheduling queue rejected a job.
    #[error("cascade queue full (capacity {capacity})")]
    CascadeQueueFull {
        /// The configured queue capacity.
        capacity: usize,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A document-store failure occurred.
    #[error("store error: {details}")]
    Store {
        /// Details about the failure.
        details: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store {
            details: err.to_string(),
        }
    }
}

impl Error {
    /// Check if the error indicates a missing node.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagetree::{Error, NodeId};
    ///
    /// let err = Error::NotFound { id: NodeId::new("gone").unwrap() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is the depth safety fuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagetree::{Error, NodeId};
    ///
    /// let err = Error::DepthExceeded {
    ///     id: NodeId::new("deep").unwrap(),
    ///     max_depth: 20,
    /// };
    /// assert!(err.is_depth_exceeded());
    /// ```
    #[must_use]
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, Self::DepthExceeded { .. })
    }

    /// Wraps a store-level failure as a resolution failure for `id`.
    ///
    /// `NotFound` and `DepthExceeded` pass through unwrapped so callers can
    /// still match on them directly.
    #[must_use]
    pub(crate) fn into_resolution(self, id: NodeId) -> Self {
        match self {
            Self::NotFound { .. } | Self::DepthExceeded { .. } | Self::Resolution { .. } => self,
            other => Self::Resolution {
                id,
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::NotFound { id: id("page-7") };
        let display = format!("{err}");
        assert!(display.contains("not found"));
        assert!(display.contains("page-7"));
    }

    #[test]
    fn test_depth_exceeded_error() {
        let err = Error::DepthExceeded {
            id: id("leaf"),
            max_depth: 20,
        };
        let display = format!("{err}");
        assert!(display.contains("depth limit 20"));
        assert!(display.contains("leaf"));
    }

    #[test]
    fn test_resolution_error_wraps_source() {
        let err = Error::Store {
            details: "disk on fire".to_string(),
        }
        .into_resolution(id("leaf"));
        let display = format!("{err}");
        assert!(display.contains("resolution failed for leaf"));
        assert!(display.contains("disk on fire"));
    }

    #[test]
    fn test_into_resolution_passes_through_not_found() {
        let err = Error::NotFound { id: id("gone") }.into_resolution(id("leaf"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_into_resolution_passes_through_depth_exceeded() {
        let err = Error::DepthExceeded {
            id: id("deep"),
            max_depth: 3,
        }
        .into_resolution(id("leaf"));
        assert!(err.is_depth_exceeded());
    }

    #[test]
    fn test_cascade_child_error() {
        let err = Error::CascadeChild {
            id: id("child-2"),
            source: Box::new(Error::Store {
                details: "write refused".to_string(),
            }),
        };
        let display = format!("{err}");
        assert!(display.contains("cascade update failed"));
        assert!(display.contains("child-2"));
    }

    #[test]
    fn test_cascade_queue_full_error() {
        let err = Error::CascadeQueueFull { capacity: 64 };
        let display = format!("{err}");
        assert!(display.contains("queue full"));
        assert!(display.contains("64"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "slug".to_string(),
            message: "must be non-empty".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("slug"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Err(Error::NotFound { id: id("x") })
        }

        assert!(returns_result().is_err());
    }
}
