//! SQLite-backed document store.
//!
//! This store keeps the page tree in a single `nodes` table, configured for
//! concurrent access: WAL journal mode, `synchronous = NORMAL`, and a busy
//! timeout. The schema carries a version in `PRAGMA user_version` so an
//! incompatible database is rejected rather than misread.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, PageType, Slug, Status};

use super::DocumentStore;

/// Current schema version stored in `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

/// SQL to create the nodes table and its parent index.
const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    id          TEXT PRIMARY KEY,
    slug        TEXT NOT NULL,
    parent      TEXT,
    page_type   TEXT NOT NULL,
    status      TEXT NOT NULL,
    url         TEXT,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent);
";

/// Returns the default data directory (`~/.pagetree`).
///
/// Falls back to a relative `.pagetree` directory when the home directory
/// cannot be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    home::home_dir()
        .map_or_else(|| PathBuf::from(".pagetree"), |dir| dir.join(".pagetree"))
}

/// Configuration for opening a [`SqliteStore`].
///
/// # Examples
///
/// ```
/// use pagetree::store::SqliteStoreConfig;
/// use std::time::Duration;
///
/// let config = SqliteStoreConfig::new("/tmp/pagetree.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Whether to create the file and its parent directory if missing.
    pub auto_create: bool,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl SqliteStoreConfig {
    /// Creates a configuration for the given database path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            auto_create: true,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Creates a configuration pointing at the default data directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(default_data_dir().join("pagetree.db"))
    }

    /// Disables auto-creation of a missing database file.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// A SQLite-backed [`DocumentStore`].
///
/// The connection sits behind a mutex so the store can be shared with the
/// cascade worker thread; SQLite's own per-database write serialization is
/// relied upon across processes.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (and if needed initializes) a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created, PRAGMA
    /// settings cannot be applied, or the schema version is unsupported.
    pub fn open(config: SqliteStoreConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };
        let conn = Connection::open_with_flags(&config.path, flags)?;

        // PRAGMA journal_mode returns a row, so query_row is required.
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        match version {
            0 => {
                conn.execute_batch(CREATE_SCHEMA)?;
                conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
            }
            SCHEMA_VERSION => {}
            other => {
                return Err(Error::Store {
                    details: format!(
                        "unsupported schema version: expected {SCHEMA_VERSION}, found {other}"
                    ),
                });
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Store {
            details: "sqlite connection lock poisoned".to_string(),
        })
    }

    fn row_to_node(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNode> {
        Ok(RawNode {
            id: row.get(0)?,
            slug: row.get(1)?,
            parent: row.get(2)?,
            page_type: row.get(3)?,
            status: row.get(4)?,
            url: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Row image before field-level validation.
struct RawNode {
    id: String,
    slug: String,
    parent: Option<String>,
    page_type: String,
    status: String,
    url: Option<String>,
    updated_at: String,
}

impl RawNode {
    fn into_node(self) -> Result<Node> {
        let updated_at = self
            .updated_at
            .parse::<DateTime<Utc>>()
            .map_err(|e| Error::Store {
                details: format!("corrupt updated_at for node {}: {e}", self.id),
            })?;
        Ok(Node {
            id: NodeId::new(self.id)?,
            slug: Slug::new(self.slug)?,
            parent: self.parent.map(NodeId::new).transpose()?,
            page_type: self.page_type.parse::<PageType>()?,
            status: self.status.parse::<Status>()?,
            url: self.url,
            updated_at,
        })
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, id: &NodeId) -> Result<Option<Node>> {
        let conn = self.lock()?;
        let raw = conn
            .query_row(
                "SELECT id, slug, parent, page_type, status, url, updated_at
                 FROM nodes WHERE id = ?1",
                params![id.as_str()],
                Self::row_to_node,
            )
            .optional()?;
        raw.map(RawNode::into_node).transpose()
    }

    fn children_of(&self, id: &NodeId) -> Result<Vec<Node>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, slug, parent, page_type, status, url, updated_at
             FROM nodes WHERE parent = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![id.as_str()], Self::row_to_node)?;
        let mut children = Vec::new();
        for raw in rows {
            children.push(raw?.into_node()?);
        }
        Ok(children)
    }

    fn insert(&self, node: &Node) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO nodes
             (id, slug, parent, page_type, status, url, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                node.id.as_str(),
                node.slug.as_str(),
                node.parent.as_ref().map(NodeId::as_str),
                node.page_type.to_string(),
                node.status.to_string(),
                node.url,
                node.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn set_url(&self, id: &NodeId, url: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE nodes SET url = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.as_str(), url, Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(Error::NotFound { id: id.clone() });
        }
        Ok(())
    }

    fn set_parent(&self, id: &NodeId, parent: Option<NodeId>) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE nodes SET parent = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                id.as_str(),
                parent.as_ref().map(NodeId::as_str),
                Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound { id: id.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(SqliteStoreConfig::new(dir.path().join("t.db"))).unwrap();
        (dir, store)
    }

    fn node(id: &str, slug: &str, parent: Option<&str>) -> Node {
        let mut builder = Node::builder(NodeId::new(id).unwrap(), Slug::new(slug).unwrap());
        if let Some(parent) = parent {
            builder = builder.parent(NodeId::new(parent).unwrap());
        }
        builder.build()
    }

    #[test]
    fn test_open_initializes_schema() {
        let (_dir, store) = open_temp();
        let conn = store.lock().unwrap();
        let version: u32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_open_rejects_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("PRAGMA user_version = 99").unwrap();
        }
        let err = SqliteStore::open(SqliteStoreConfig::new(&path)).unwrap_err();
        assert!(format!("{err}").contains("unsupported schema version"));
    }

    #[test]
    fn test_insert_get_round_trip() {
        let (_dir, store) = open_temp();
        let mut original = node("a", "alpha", Some("root"));
        original.url = Some("/alpha".to_string());
        store.insert(&original).unwrap();

        let loaded = store.get(&original.id).unwrap().unwrap();
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.slug, original.slug);
        assert_eq!(loaded.parent, original.parent);
        assert_eq!(loaded.page_type, original.page_type);
        assert_eq!(loaded.status, original.status);
        assert_eq!(loaded.url, original.url);
    }

    #[test]
    fn test_children_of_sorted_by_id() {
        let (_dir, store) = open_temp();
        store.insert(&node("root", "home", None)).unwrap();
        store.insert(&node("b", "beta", Some("root"))).unwrap();
        store.insert(&node("a", "alpha", Some("root"))).unwrap();
        store.insert(&node("c", "other", Some("a"))).unwrap();

        let children = store.children_of(&NodeId::new("root").unwrap()).unwrap();
        let ids: Vec<&str> = children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_set_url_persists() {
        let (_dir, store) = open_temp();
        store.insert(&node("a", "alpha", None)).unwrap();

        let id = NodeId::new("a").unwrap();
        store.set_url(&id, "/alpha").unwrap();
        assert_eq!(store.get(&id).unwrap().unwrap().url.as_deref(), Some("/alpha"));
    }

    #[test]
    fn test_set_url_missing_is_not_found() {
        let (_dir, store) = open_temp();
        let err = store.set_url(&NodeId::new("x").unwrap(), "/x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_parent_persists() {
        let (_dir, store) = open_temp();
        store.insert(&node("root", "home", None)).unwrap();
        store.insert(&node("a", "alpha", None)).unwrap();

        let a = NodeId::new("a").unwrap();
        let root = NodeId::new("root").unwrap();
        store.set_parent(&a, Some(root.clone())).unwrap();
        assert_eq!(store.get(&a).unwrap().unwrap().parent, Some(root));
    }
}
