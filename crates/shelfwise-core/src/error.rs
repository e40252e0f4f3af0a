//! Catalog error handling
//!
//! Every mutation reports a typed error instead of panicking. Errors are
//! grouped into kinds so callers can decide how to react: argument and
//! conflict errors abort the requested action, storage errors are fatal
//! for the operation and should be shown to the user.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced category does not exist
    NotFound,
    /// The request clashes with existing data (duplicate, cycle, non-empty)
    Conflict,
    /// The request itself is malformed
    InvalidArgument,
    /// The storage layer failed
    Storage,
}

/// Errors that can occur during catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Parent or target category is missing
    #[error("Category {id} not found")]
    CategoryNotFound { id: i64 },

    /// A category with this name already exists
    #[error("Category '{name}' already exists")]
    DuplicateName { name: String },

    /// Re-parenting would make a category its own ancestor
    #[error("Cannot move category {id} under {parent_id}: {parent_id} is one of its descendants")]
    Cycle { id: i64, parent_id: i64 },

    /// Category still has products assigned
    #[error("Category {id} has {count} product(s) assigned")]
    HasProducts { id: i64, count: i64 },

    /// Category still has child categories
    #[error("Category {id} has {count} subcategory(ies)")]
    HasSubcategories { id: i64, count: i64 },

    /// Update called without any field to change
    #[error("Nothing to update: provide a new name and/or a new parent")]
    NothingToUpdate,

    /// Category given as its own parent
    #[error("Category {id} cannot be its own parent")]
    SelfParent { id: i64 },

    /// Name is empty or whitespace only
    #[error("Name cannot be empty")]
    EmptyName,

    /// Price is negative or not a finite number
    #[error("Invalid price {price}: must be a non-negative number")]
    InvalidPrice { price: f64 },

    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl CatalogError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::CategoryNotFound { .. } => ErrorKind::NotFound,
            CatalogError::DuplicateName { .. }
            | CatalogError::Cycle { .. }
            | CatalogError::HasProducts { .. }
            | CatalogError::HasSubcategories { .. } => ErrorKind::Conflict,
            CatalogError::NothingToUpdate
            | CatalogError::SelfParent { .. }
            | CatalogError::EmptyName
            | CatalogError::InvalidPrice { .. } => ErrorKind::InvalidArgument,
            CatalogError::CreateDirectory { .. } | CatalogError::Database(_) => ErrorKind::Storage,
        }
    }

    /// Check if the storage layer failed (as opposed to a rejected request)
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CatalogError::HasProducts { .. } => {
                Some("Move or delete the products in this category first.")
            }
            CatalogError::HasSubcategories { .. } => {
                Some("Move or delete the subcategories first.")
            }
            CatalogError::Cycle { .. } => {
                Some("Choose a parent outside of this category's subtree.")
            }
            CatalogError::DuplicateName { .. } => Some("Pick a different category name."),
            CatalogError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            _ => None,
        }
    }

    /// Map a UNIQUE constraint failure on insert/update to `DuplicateName`
    pub(crate) fn from_write(error: rusqlite::Error, name: &str) -> Self {
        if is_unique_violation(&error) {
            CatalogError::DuplicateName {
                name: name.to_string(),
            }
        } else {
            CatalogError::Database(error)
        }
    }
}

/// Check if a SQLite error is a UNIQUE constraint violation
fn is_unique_violation(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.code == rusqlite::ErrorCode::ConstraintViolation
                && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
