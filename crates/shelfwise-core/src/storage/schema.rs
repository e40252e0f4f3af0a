//! SQLite schema for the catalog
//!
//! `ensure_schema` is idempotent and runs on every startup. The only upgrade
//! path is additive: a `categories` table created before hierarchy support
//! gets its `parent_id` column added in place.

use rusqlite::{Connection, Result};
use tracing::info;

/// Create missing tables, columns and indexes
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Categories form a forest through parent_id
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            parent_id INTEGER,
            FOREIGN KEY (parent_id) REFERENCES categories(id)
        );
        "#,
    )?;

    // Tables from before the hierarchy existed lack parent_id
    if !column_exists(conn, "categories", "parent_id")? {
        info!("Adding parent_id column to legacy categories table");
        conn.execute("ALTER TABLE categories ADD COLUMN parent_id INTEGER", [])?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            category_id INTEGER,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        );

        -- Child and product lookups for deletion guards and tree queries
        CREATE INDEX IF NOT EXISTS idx_categories_parent_id ON categories(parent_id);
        CREATE INDEX IF NOT EXISTS idx_products_category_id ON products(category_id);
        "#,
    )?;

    Ok(())
}

/// Check if a table exists
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?
        .exists([table])
}

/// Check if a table has a column
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_ensure_schema() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"categories".to_string()));
        assert!(tables.contains(&"products".to_string()));
        assert!(column_exists(&conn, "categories", "parent_id").unwrap());
        assert!(column_exists(&conn, "products", "category_id").unwrap());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO categories (name) VALUES ('Tools')", [])
            .unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_legacy_categories_table_gets_parent_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            INSERT INTO categories (name) VALUES ('Legacy');
            "#,
        )
        .unwrap();
        assert!(!column_exists(&conn, "categories", "parent_id").unwrap());

        ensure_schema(&conn).unwrap();

        assert!(column_exists(&conn, "categories", "parent_id").unwrap());
        let (name, parent): (String, Option<i64>) = conn
            .query_row("SELECT name, parent_id FROM categories", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(name, "Legacy");
        assert_eq!(parent, None);
    }

    #[test]
    fn test_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "products").unwrap());
        ensure_schema(&conn).unwrap();
        assert!(table_exists(&conn, "products").unwrap());
    }

    #[test]
    fn test_indexes_exist() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(indexes.contains(&"idx_categories_parent_id".to_string()));
        assert!(indexes.contains(&"idx_products_category_id".to_string()));
    }
}
