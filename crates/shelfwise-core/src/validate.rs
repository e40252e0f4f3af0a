//! Input validation shared by the stores

use crate::error::{CatalogError, CatalogResult};

/// Trim a name, rejecting empty or whitespace-only input
pub fn name(value: &str) -> CatalogResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    Ok(trimmed)
}

/// Accept only finite, non-negative prices
pub fn price(value: f64) -> CatalogResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CatalogError::InvalidPrice { price: value })
    }
}
