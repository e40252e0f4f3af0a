//! Database handle and per-operation sessions
//!
//! `Database` only remembers where the SQLite file lives. Every catalog
//! operation opens its own connection through [`Database::with_session`],
//! runs its statements and drops the connection again, on success and on
//! error alike. Nothing is held open between operations.
//!
//! Foreign-key enforcement is switched off on every connection (the bundled
//! SQLite build turns it on), so products may reference a category id that
//! does not exist.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::storage::schema::ensure_schema;

/// Location of the catalog database
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Point at the database configured in `config`, creating its directory
    pub fn open(config: &Config) -> CatalogResult<Self> {
        let db = Self::at(config.database_path());
        db.ensure_parent_dir()?;
        Ok(db)
    }

    /// Point at a database file without touching the filesystem
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the database file exists yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size of the database file in bytes (0 if missing)
    pub fn size_bytes(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Open a fresh connection
    pub fn session(&self) -> CatalogResult<Connection> {
        debug!("Opening session on {:?}", self.path);
        let conn = Connection::open(&self.path)?;
        configure_connection(&conn)?;
        Ok(conn)
    }

    /// Run `f` on a fresh connection and close it afterwards
    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&Connection) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let conn = self.session()?;
        f(&conn)
    }

    /// Create tables and columns that are missing
    pub fn ensure_schema(&self) -> CatalogResult<()> {
        self.with_session(|conn| Ok(ensure_schema(conn)?))
    }

    fn ensure_parent_dir(&self) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| {
                    CatalogError::CreateDirectory {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }
        Ok(())
    }
}

/// Apply per-connection settings
///
/// Product category references are not checked, so foreign keys stay off.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::table_exists;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_data_dir(temp_dir.path().join("a").join("b"));

        let db = Database::open(&config).unwrap();
        assert!(temp_dir.path().join("a").join("b").exists());
        assert!(!db.exists());
        assert_eq!(db.size_bytes(), 0);
    }

    #[test]
    fn test_ensure_schema_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::at(temp_dir.path().join("catalog.db"));

        db.ensure_schema().unwrap();

        assert!(db.exists());
        let has_table = db
            .with_session(|conn| Ok(table_exists(conn, "categories")?))
            .unwrap();
        assert!(has_table);
    }

    #[test]
    fn test_sessions_see_committed_writes() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::at(temp_dir.path().join("catalog.db"));
        db.ensure_schema().unwrap();

        db.with_session(|conn| {
            conn.execute("INSERT INTO categories (name) VALUES ('Tools')", [])?;
            Ok(())
        })
        .unwrap();

        let count: i64 = db
            .with_session(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_session_error_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::at(temp_dir.path().join("catalog.db"));

        let result: CatalogResult<()> = db.with_session(|conn| {
            conn.execute("INSERT INTO nowhere VALUES (1)", [])?;
            Ok(())
        });
        assert!(result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_sessions_do_not_enforce_foreign_keys() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::at(temp_dir.path().join("catalog.db"));
        db.ensure_schema().unwrap();

        let enabled: bool = db
            .with_session(|conn| {
                Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?)
            })
            .unwrap();
        assert!(!enabled);

        db.with_session(|conn| {
            conn.execute(
                "INSERT INTO products (name, price, category_id) VALUES ('Stray', 1.0, 404)",
                [],
            )?;
            Ok(())
        })
        .unwrap();
    }
}
