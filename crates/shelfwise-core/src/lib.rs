//! Shelfwise Core Library
//!
//! This crate provides the core functionality for Shelfwise, a product
//! catalog whose categories form a hierarchy stored in SQLite.
//!
//! # Architecture
//!
//! - **SQLite**: Source of truth for categories and products
//! - **Sessions**: Every operation opens its own connection and closes it
//!   when done
//! - **Hierarchy**: The category tree is rebuilt in memory from the flat
//!   `categories` table on each request
//!
//! # Quick Start
//!
//! ```text
//! let catalog = Catalog::open()?;
//!
//! let tools = catalog.add_category("Tools", None)?;
//! let drills = catalog.add_category("Drills", Some(tools))?;
//! catalog.add_product("Cordless Drill", 89.0, Some(drills))?;
//!
//! for node in catalog.category_tree()? {
//!     println!("{}", node.name);
//! }
//! ```
//!
//! # Modules
//!
//! - `catalog`: Unified catalog interface (main entry point)
//! - `category`: Category store with hierarchy integrity checks
//! - `product`: Product store
//! - `hierarchy`: Tree building and outline rendering
//! - `models`: Data structures for categories, products and tree nodes
//! - `storage`: Database sessions and schema management
//! - `config`: Application configuration

pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod product;
pub mod storage;
mod validate;

pub use catalog::Catalog;
pub use category::CategoryStore;
pub use config::Config;
pub use error::{CatalogError, CatalogResult, ErrorKind};
pub use hierarchy::{build_tree, catalog_outline, CategoryArena};
pub use models::{
    CatalogStats, Category, CategoryNode, OutlineEntry, OutlineItem, Product, ProductListing,
};
pub use product::ProductStore;
pub use storage::Database;
