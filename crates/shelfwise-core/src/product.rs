//! Product store
//!
//! CRUD over `products`. The category reference is stored as given and is
//! not checked against `categories`; listings resolve it with a LEFT JOIN
//! and report `category_name: None` when it does not resolve.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::CatalogResult;
use crate::models::{Product, ProductListing};
use crate::validate;

const LISTING_SELECT: &str = r#"
    SELECT p.id, p.name, p.price, p.category_id, c.name
    FROM products p
    LEFT JOIN categories c ON p.category_id = c.id
"#;

/// Product operations on one open connection
pub struct ProductStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ProductStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a product, returning its id
    pub fn add(&self, name: &str, price: f64, category_id: Option<i64>) -> CatalogResult<i64> {
        let name = validate::name(name)?;
        let price = validate::price(price)?;

        self.conn.execute(
            "INSERT INTO products (name, price, category_id) VALUES (?1, ?2, ?3)",
            params![name, price, category_id],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(id, name, price, ?category_id, "Product added");
        Ok(id)
    }

    /// All products with their category names, ordered by id
    pub fn list_all(&self) -> CatalogResult<Vec<ProductListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LISTING_SELECT} ORDER BY p.id"))?;
        let products = stmt
            .query_map([], ProductListing::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Get a product by id
    pub fn get(&self, id: i64) -> CatalogResult<Option<ProductListing>> {
        Ok(self
            .conn
            .query_row(
                &format!("{LISTING_SELECT} WHERE p.id = ?1"),
                [id],
                ProductListing::from_row,
            )
            .optional()?)
    }

    /// Products assigned directly to a category
    pub fn in_category(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, price, category_id FROM products WHERE category_id = ?1 ORDER BY id",
        )?;
        let products = stmt
            .query_map([category_id], Product::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Overwrite name, price and category; returns whether the product existed
    pub fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        category_id: Option<i64>,
    ) -> CatalogResult<bool> {
        let name = validate::name(name)?;
        let price = validate::price(price)?;

        let changed = self.conn.execute(
            "UPDATE products SET name = ?1, price = ?2, category_id = ?3 WHERE id = ?4",
            params![name, price, category_id, id],
        )?;
        info!(id, changed = changed > 0, "Product updated");
        Ok(changed > 0)
    }

    /// Delete a product; returns whether it existed
    pub fn delete(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", [id])?;
        info!(id, deleted = deleted > 0, "Product deleted");
        Ok(deleted > 0)
    }

    /// Number of products
    pub fn count(&self) -> CatalogResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?)
    }

    /// Number of products whose category is unset or does not resolve
    pub fn uncategorized_count(&self) -> CatalogResult<i64> {
        Ok(self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE c.id IS NULL
            "#,
            [],
            |row| row.get(0),
        )?)
    }
}
