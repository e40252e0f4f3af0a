//! Category store
//!
//! CRUD over the self-referencing `categories` table. The hierarchy rules
//! live here and are checked before any write:
//!
//! - a parent must exist when one is given
//! - re-parenting may not create a cycle
//! - only categories without products and without children can be deleted
//!
//! The cycle check and the following UPDATE run on the same connection but
//! not inside one transaction, so a concurrent writer could slip in between.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::hierarchy::CategoryArena;
use crate::models::Category;
use crate::validate;

/// Category operations on one open connection
pub struct CategoryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CategoryStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a category, returning its id
    pub fn add(&self, name: &str, parent_id: Option<i64>) -> CatalogResult<i64> {
        let name = validate::name(name)?;

        if let Some(parent_id) = parent_id {
            self.require(parent_id)?;
        }

        self.conn
            .execute(
                "INSERT INTO categories (name, parent_id) VALUES (?1, ?2)",
                params![name, parent_id],
            )
            .map_err(|e| CatalogError::from_write(e, name))?;

        let id = self.conn.last_insert_rowid();
        info!(id, name, ?parent_id, "Category added");
        Ok(id)
    }

    /// All categories, ordered by id
    pub fn list_all(&self) -> CatalogResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, parent_id FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], Category::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Get a category by id
    pub fn get(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, parent_id FROM categories WHERE id = ?1",
                [id],
                Category::from_row,
            )
            .optional()?)
    }

    /// Check if a category exists
    pub fn exists(&self, id: i64) -> CatalogResult<bool> {
        Ok(self
            .conn
            .prepare("SELECT 1 FROM categories WHERE id = ?1")?
            .exists([id])?)
    }

    /// Rename and/or re-parent a category
    ///
    /// `None` leaves a field unchanged. Returns whether a row was updated,
    /// which is `false` when `id` does not exist.
    pub fn update(
        &self,
        id: i64,
        new_name: Option<&str>,
        new_parent_id: Option<i64>,
    ) -> CatalogResult<bool> {
        let new_name = new_name.map(validate::name).transpose()?;

        if let Some(parent_id) = new_parent_id {
            self.check_new_parent(id, parent_id)?;
        }

        let changed = match (new_name, new_parent_id) {
            (Some(name), Some(parent_id)) => self
                .conn
                .execute(
                    "UPDATE categories SET name = ?1, parent_id = ?2 WHERE id = ?3",
                    params![name, parent_id, id],
                )
                .map_err(|e| CatalogError::from_write(e, name))?,
            (Some(name), None) => self
                .conn
                .execute(
                    "UPDATE categories SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )
                .map_err(|e| CatalogError::from_write(e, name))?,
            (None, Some(parent_id)) => self.conn.execute(
                "UPDATE categories SET parent_id = ?1 WHERE id = ?2",
                params![parent_id, id],
            )?,
            (None, None) => return Err(CatalogError::NothingToUpdate),
        };

        info!(id, changed = changed > 0, "Category updated");
        Ok(changed > 0)
    }

    /// Detach a category from its parent, making it a root
    pub fn move_to_root(&self, id: i64) -> CatalogResult<bool> {
        let changed = self
            .conn
            .execute("UPDATE categories SET parent_id = NULL WHERE id = ?1", [id])?;
        info!(id, changed = changed > 0, "Category moved to root");
        Ok(changed > 0)
    }

    /// Delete a category that has no products and no subcategories
    pub fn delete(&self, id: i64) -> CatalogResult<bool> {
        let product_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE category_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        if product_count > 0 {
            warn!(id, product_count, "Refusing to delete category with products");
            return Err(CatalogError::HasProducts {
                id,
                count: product_count,
            });
        }

        let child_count = self.child_count(id)?;
        if child_count > 0 {
            warn!(id, child_count, "Refusing to delete category with subcategories");
            return Err(CatalogError::HasSubcategories {
                id,
                count: child_count,
            });
        }

        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        info!(id, deleted = deleted > 0, "Category deleted");
        Ok(deleted > 0)
    }

    /// Direct children of a category
    pub fn subcategories_of(&self, parent_id: i64) -> CatalogResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, parent_id FROM categories WHERE parent_id = ?1 ORDER BY id",
        )?;
        let categories = stmt
            .query_map([parent_id], Category::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Parent of a category; `None` for roots, dangling parents and unknown ids
    pub fn parent_of(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT parent.id, parent.name, parent.parent_id
                FROM categories child
                JOIN categories parent ON child.parent_id = parent.id
                WHERE child.id = ?1
                "#,
                [id],
                Category::from_row,
            )
            .optional()?)
    }

    /// Ids of every category below `id`
    pub fn descendants_of(&self, id: i64) -> CatalogResult<Vec<i64>> {
        Ok(self.arena()?.descendants(id))
    }

    /// Load all categories into an arena
    pub fn arena(&self) -> CatalogResult<CategoryArena> {
        Ok(CategoryArena::build(self.list_all()?))
    }

    /// Number of categories
    pub fn count(&self) -> CatalogResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?)
    }

    /// Number of top-level categories: no parent, or a parent that is gone
    pub fn root_count(&self) -> CatalogResult<i64> {
        Ok(self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM categories c
            LEFT JOIN categories parent ON c.parent_id = parent.id
            WHERE parent.id IS NULL
            "#,
            [],
            |row| row.get(0),
        )?)
    }

    fn child_count(&self, id: i64) -> CatalogResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE parent_id = ?1",
            [id],
            |row| row.get(0),
        )?)
    }

    fn require(&self, id: i64) -> CatalogResult<()> {
        if self.exists(id)? {
            Ok(())
        } else {
            warn!(id, "Parent category not found");
            Err(CatalogError::CategoryNotFound { id })
        }
    }

    fn check_new_parent(&self, id: i64, parent_id: i64) -> CatalogResult<()> {
        if parent_id == id {
            return Err(CatalogError::SelfParent { id });
        }
        self.require(parent_id)?;

        if self.arena()?.is_descendant(id, parent_id) {
            warn!(id, parent_id, "Re-parent rejected: would create a cycle");
            return Err(CatalogError::Cycle { id, parent_id });
        }
        Ok(())
    }
}
