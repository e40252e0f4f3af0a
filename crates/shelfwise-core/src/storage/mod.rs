//! Storage layer
//!
//! SQLite is the single source of truth. Two tables:
//!
//! - `categories(id, name UNIQUE, parent_id NULL -> categories.id)`
//! - `products(id, name, price, category_id NULL -> categories.id)`

pub mod database;
pub mod schema;

pub use database::{configure_connection, Database};
pub use schema::{column_exists, ensure_schema, table_exists};
