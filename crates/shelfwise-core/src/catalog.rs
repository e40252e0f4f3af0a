//! Unified catalog interface
//!
//! `Catalog` is the call surface the presentation layer uses. It owns the
//! configuration and the database location; every method opens a session,
//! runs one store operation and closes the session again.
//!
//! ## Usage
//!
//! ```ignore
//! let catalog = Catalog::open()?;  // Loads config, ensures schema
//!
//! let tools = catalog.add_category("Tools", None)?;
//! catalog.add_product("Hammer", 12.5, Some(tools))?;
//!
//! let forest = catalog.category_tree()?;
//! ```

use anyhow::{Context, Result};

use crate::category::CategoryStore;
use crate::config::Config;
use crate::error::CatalogResult;
use crate::hierarchy::{build_tree, catalog_outline};
use crate::models::{Category, CategoryNode, CatalogStats, OutlineEntry, Product, ProductListing};
use crate::product::ProductStore;
use crate::storage::Database;

/// Catalog of categories and products backed by SQLite
pub struct Catalog {
    config: Config,
    db: Database,
}

impl Catalog {
    /// Open the catalog using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the catalog with a specific configuration
    ///
    /// Creates the data directory and brings the schema up to date.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let db = Database::open(&config).context("Failed to prepare database location")?;
        let catalog = Self { config, db };
        catalog
            .ensure_schema()
            .with_context(|| format!("Failed to initialize schema in {:?}", catalog.db.path()))?;
        Ok(catalog)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the database handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create missing tables and columns; safe to call repeatedly
    pub fn ensure_schema(&self) -> CatalogResult<()> {
        self.db.ensure_schema()
    }

    // ==================== Category Operations ====================

    /// Add a category, optionally under a parent
    pub fn add_category(&self, name: &str, parent_id: Option<i64>) -> CatalogResult<i64> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).add(name, parent_id))
    }

    /// Get all categories
    pub fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.db.with_session(|conn| CategoryStore::new(conn).list_all())
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        self.db.with_session(|conn| CategoryStore::new(conn).get(id))
    }

    /// Rename and/or re-parent a category
    pub fn update_category(
        &self,
        id: i64,
        name: Option<&str>,
        parent_id: Option<i64>,
    ) -> CatalogResult<bool> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).update(id, name, parent_id))
    }

    /// Make a category a root
    pub fn move_category_to_root(&self, id: i64) -> CatalogResult<bool> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).move_to_root(id))
    }

    /// Delete an empty leaf category
    pub fn delete_category(&self, id: i64) -> CatalogResult<bool> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).delete(id))
    }

    /// Direct children of a category
    pub fn subcategories(&self, parent_id: i64) -> CatalogResult<Vec<Category>> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).subcategories_of(parent_id))
    }

    /// Parent of a category, if any
    pub fn parent_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).parent_of(id))
    }

    /// Ids of every category below `id`
    pub fn descendants(&self, id: i64) -> CatalogResult<Vec<i64>> {
        self.db
            .with_session(|conn| CategoryStore::new(conn).descendants_of(id))
    }

    /// Names from the root down to `id`, e.g. `["Tools", "Power", "Drills"]`
    pub fn category_path(&self, id: i64) -> CatalogResult<Vec<String>> {
        self.db.with_session(|conn| {
            let arena = CategoryStore::new(conn).arena()?;
            Ok(arena.path_to(id).into_iter().map(|c| c.name.clone()).collect())
        })
    }

    /// The category forest, rebuilt from the table on every call
    pub fn category_tree(&self) -> CatalogResult<Vec<CategoryNode>> {
        let categories = self.list_categories()?;
        Ok(build_tree(categories))
    }

    // ==================== Product Operations ====================

    /// Add a product; the category is not checked
    pub fn add_product(
        &self,
        name: &str,
        price: f64,
        category_id: Option<i64>,
    ) -> CatalogResult<i64> {
        self.db
            .with_session(|conn| ProductStore::new(conn).add(name, price, category_id))
    }

    /// Get all products with category names
    pub fn list_products(&self) -> CatalogResult<Vec<ProductListing>> {
        self.db.with_session(|conn| ProductStore::new(conn).list_all())
    }

    /// Get a product by ID
    pub fn get_product(&self, id: i64) -> CatalogResult<Option<ProductListing>> {
        self.db.with_session(|conn| ProductStore::new(conn).get(id))
    }

    /// Products assigned directly to a category
    pub fn products_in_category(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        self.db
            .with_session(|conn| ProductStore::new(conn).in_category(category_id))
    }

    /// Overwrite a product's name, price and category
    pub fn update_product(
        &self,
        id: i64,
        name: &str,
        price: f64,
        category_id: Option<i64>,
    ) -> CatalogResult<bool> {
        self.db
            .with_session(|conn| ProductStore::new(conn).update(id, name, price, category_id))
    }

    /// Delete a product
    pub fn delete_product(&self, id: i64) -> CatalogResult<bool> {
        self.db
            .with_session(|conn| ProductStore::new(conn).delete(id))
    }

    // ==================== Presentation ====================

    /// Category tree with products interleaved, flattened for display
    pub fn catalog_outline(&self) -> CatalogResult<Vec<OutlineEntry>> {
        let (categories, products) = self.db.with_session(|conn| {
            let categories = CategoryStore::new(conn).list_all()?;
            let products: Vec<Product> = ProductStore::new(conn)
                .list_all()?
                .iter()
                .map(ProductListing::to_product)
                .collect();
            Ok((categories, products))
        })?;

        Ok(catalog_outline(&build_tree(categories), &products))
    }

    /// Row counts
    pub fn stats(&self) -> CatalogResult<CatalogStats> {
        self.db.with_session(|conn| {
            let categories = CategoryStore::new(conn);
            let products = ProductStore::new(conn);
            Ok(CatalogStats {
                categories: categories.count()?,
                root_categories: categories.root_count()?,
                products: products.count()?,
                uncategorized_products: products.uncategorized_count()?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, ErrorKind};
    use crate::models::OutlineItem;
    use tempfile::TempDir;

    fn open(temp_dir: &TempDir) -> Catalog {
        Catalog::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap()
    }

    #[test]
    fn test_open_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_data_dir(temp_dir.path().join("data"));

        let catalog = Catalog::open_with_config(config.clone()).unwrap();

        assert!(config.database_path().exists());
        assert_eq!(catalog.database().path(), config.database_path());
        assert_eq!(catalog.stats().unwrap(), CatalogStats::default());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();

        let tools;
        {
            let catalog = open(&temp_dir);
            tools = catalog.add_category("Tools", None).unwrap();
            catalog.add_product("Hammer", 12.5, Some(tools)).unwrap();
        }

        let catalog = open(&temp_dir);
        assert_eq!(catalog.get_category(tools).unwrap().unwrap().name, "Tools");
        assert_eq!(catalog.list_products().unwrap().len(), 1);
    }

    #[test]
    fn test_ensure_schema_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        catalog.add_category("Tools", None).unwrap();

        catalog.ensure_schema().unwrap();
        catalog.ensure_schema().unwrap();

        assert_eq!(catalog.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_category_tree_chain() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let a = catalog.add_category("A", None).unwrap();
        let b = catalog.add_category("B", Some(a)).unwrap();
        let c = catalog.add_category("C", Some(b)).unwrap();

        let forest = catalog.category_tree().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, a);
        assert_eq!(forest[0].children[0].id, b);
        assert_eq!(forest[0].children[0].children[0].id, c);
    }

    #[test]
    fn test_tree_reflects_mutations() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let a = catalog.add_category("A", None).unwrap();
        let b = catalog.add_category("B", None).unwrap();
        assert_eq!(catalog.category_tree().unwrap().len(), 2);

        catalog.update_category(b, None, Some(a)).unwrap();
        let forest = catalog.category_tree().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].id, b);

        catalog.move_category_to_root(b).unwrap();
        assert_eq!(catalog.category_tree().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_category_iff_empty_leaf() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let parent = catalog.add_category("Parent", None).unwrap();
        let child = catalog.add_category("Child", Some(parent)).unwrap();
        let stocked = catalog.add_category("Stocked", None).unwrap();
        let empty = catalog.add_category("Empty", None).unwrap();
        let product = catalog.add_product("Widget", 1.0, Some(stocked)).unwrap();

        assert_eq!(
            catalog.delete_category(parent).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            catalog.delete_category(stocked).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert!(catalog.delete_category(empty).unwrap());

        assert!(catalog.delete_category(child).unwrap());
        assert!(catalog.delete_category(parent).unwrap());

        catalog.delete_product(product).unwrap();
        assert!(catalog.delete_category(stocked).unwrap());
        assert!(catalog.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_update_category_errors() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let a = catalog.add_category("A", None).unwrap();
        let b = catalog.add_category("B", Some(a)).unwrap();

        assert!(matches!(
            catalog.update_category(a, None, None),
            Err(CatalogError::NothingToUpdate)
        ));
        assert!(matches!(
            catalog.update_category(a, None, Some(a)),
            Err(CatalogError::SelfParent { .. })
        ));
        assert!(matches!(
            catalog.update_category(a, None, Some(99)),
            Err(CatalogError::CategoryNotFound { id: 99 })
        ));
        assert!(matches!(
            catalog.update_category(a, None, Some(b)),
            Err(CatalogError::Cycle { .. })
        ));
    }

    #[test]
    fn test_duplicate_category_creates_no_row() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        catalog.add_category("Tools", None).unwrap();

        let err = catalog.add_category("Tools", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(catalog.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_product_without_category() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);

        catalog.add_product("Widget", 9.99, None).unwrap();

        let products = catalog.list_products().unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].category_name.is_none());
    }

    #[test]
    fn test_update_and_delete_product() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let tools = catalog.add_category("Tools", None).unwrap();
        let id = catalog.add_product("Widget", 9.99, None).unwrap();

        assert!(catalog.update_product(id, "Widget Pro", 19.99, Some(tools)).unwrap());
        let product = catalog.get_product(id).unwrap().unwrap();
        assert_eq!(product.category_name.as_deref(), Some("Tools"));
        assert_eq!(catalog.products_in_category(tools).unwrap().len(), 1);

        assert!(catalog.delete_product(id).unwrap());
        assert!(!catalog.delete_product(id).unwrap());
        assert!(!catalog.update_product(id, "Gone", 1.0, None).unwrap());
    }

    #[test]
    fn test_navigation_helpers() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let tools = catalog.add_category("Tools", None).unwrap();
        let power = catalog.add_category("Power", Some(tools)).unwrap();
        let drills = catalog.add_category("Drills", Some(power)).unwrap();

        assert_eq!(catalog.subcategories(tools).unwrap()[0].id, power);
        assert_eq!(catalog.parent_category(drills).unwrap().unwrap().id, power);
        assert!(catalog.parent_category(tools).unwrap().is_none());
        assert_eq!(
            catalog.category_path(drills).unwrap(),
            vec!["Tools", "Power", "Drills"]
        );
    }

    #[test]
    fn test_catalog_outline() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let tools = catalog.add_category("Tools", None).unwrap();
        catalog.add_category("Drills", Some(tools)).unwrap();
        catalog.add_product("Hammer", 12.5, Some(tools)).unwrap();
        catalog.add_product("Loose", 1.0, None).unwrap();

        let outline = catalog.catalog_outline().unwrap();
        let depths: Vec<usize> = outline.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0, 1]);
        assert!(matches!(outline[1].item, OutlineItem::Product { .. }));
        assert_eq!(outline[3].item, OutlineItem::Uncategorized);
    }

    #[test]
    fn test_product_with_unknown_category() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let tools = catalog.add_category("Tools", None).unwrap();

        let stray = catalog.add_product("Stray", 1.0, Some(404)).unwrap();
        let moved = catalog.add_product("Hammer", 12.5, Some(tools)).unwrap();
        assert!(catalog.update_product(moved, "Hammer", 12.5, Some(505)).unwrap());

        for id in [stray, moved] {
            let product = catalog.get_product(id).unwrap().unwrap();
            assert!(product.category_name.is_none());
        }
        assert_eq!(catalog.get_product(moved).unwrap().unwrap().category_id, Some(505));

        let outline = catalog.catalog_outline().unwrap();
        assert_eq!(outline[1].item, OutlineItem::Uncategorized);
        assert_eq!(outline.len(), 4);
        assert_eq!(catalog.stats().unwrap().uncategorized_products, 2);
    }

    #[test]
    fn test_stats() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = open(&temp_dir);
        let tools = catalog.add_category("Tools", None).unwrap();
        catalog.add_category("Drills", Some(tools)).unwrap();
        catalog.add_product("Hammer", 12.5, Some(tools)).unwrap();
        catalog.add_product("Loose", 1.0, None).unwrap();

        let stats = catalog.stats().unwrap();
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.root_categories, 1);
        assert_eq!(stats.products, 2);
        assert_eq!(stats.uncategorized_products, 1);
    }
}
