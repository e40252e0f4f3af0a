//! Data models for Shelfwise
//!
//! Defines the persisted rows (`Category`, `Product`) and the read models
//! built from them (`ProductListing`, `CategoryNode`, `OutlineEntry`).
//! Read models are projections: they are rebuilt on every read and never
//! written back.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A category row; `parent_id` is a lookup reference, not ownership
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Identity assigned by the database
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Parent category, `None` for a root
    pub parent_id: Option<i64>,
}

impl Category {
    /// Create a category value (for building trees without a database)
    pub fn new(id: i64, name: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }

    /// Check if this category has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Map a `SELECT id, name, parent_id` row
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
        })
    }
}

/// A product row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Category the product belongs to; may dangle
    pub category_id: Option<i64>,
}

impl Product {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            category_id: row.get(3)?,
        })
    }
}

/// A product joined with its category's name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListing {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: Option<i64>,
    /// `None` when the product has no category or the category is gone
    pub category_name: Option<String>,
}

impl ProductListing {
    /// Map a `SELECT p.id, p.name, p.price, p.category_id, c.name` row
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            category_id: row.get(3)?,
            category_name: row.get(4)?,
        })
    }

    /// Drop the joined name
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            category_id: self.category_id,
        }
    }
}

/// One node of the materialized category forest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Create a childless node from a category
    pub fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            children: Vec::new(),
        }
    }

    /// Count this node and everything below it
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// What an outline line shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutlineItem {
    Category { id: i64, name: String },
    Product { id: i64, name: String, price: f64 },
    /// Heading for products without a (resolvable) category
    Uncategorized,
}

/// One line of the catalog outline, with its indentation depth
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineEntry {
    pub depth: usize,
    #[serde(flatten)]
    pub item: OutlineItem,
}

/// Row counts for status output
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub categories: i64,
    pub root_categories: i64,
    pub products: i64,
    pub uncategorized_products: i64,
}
