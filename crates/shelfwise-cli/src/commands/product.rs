//! Product command handlers

use anyhow::{anyhow, Context, Result};

use shelfwise_core::{Catalog, ProductListing};

use crate::output::Output;
use crate::prompt::confirm;

/// Fields to change on `product edit`; `None` keeps the current value
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the category
    pub category: Option<Option<i64>>,
}

impl ProductChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none()
    }

    /// Merge onto the stored product, since the store overwrites every field
    fn apply(self, current: &ProductListing) -> (String, f64, Option<i64>) {
        (
            self.name.unwrap_or_else(|| current.name.clone()),
            self.price.unwrap_or(current.price),
            self.category.unwrap_or(current.category_id),
        )
    }
}

/// Create a new product
pub fn add(
    catalog: &Catalog,
    name: String,
    price: f64,
    category: Option<i64>,
    output: &Output,
) -> Result<()> {
    let id = catalog
        .add_product(&name, price, category)
        .context("Failed to create product")?;

    output.created("product", id);
    Ok(())
}

/// List products, optionally only those directly in one category
pub fn list(catalog: &Catalog, category: Option<i64>, output: &Output) -> Result<()> {
    match category {
        Some(category_id) => {
            let products = catalog.products_in_category(category_id)?;
            output.print_category_products(&products);
        }
        None => {
            let products = catalog.list_products()?;
            output.print_products(&products);
        }
    }
    Ok(())
}

/// Show a single product
pub fn show(catalog: &Catalog, id: i64, output: &Output) -> Result<()> {
    let product = find(catalog, id)?;
    output.print_product(&product);
    Ok(())
}

/// Edit a product
pub fn edit(catalog: &Catalog, id: i64, changes: ProductChanges, output: &Output) -> Result<()> {
    if changes.is_empty() {
        return Err(anyhow!(
            "Nothing to update. Pass --name, --price, --category or --uncategorized."
        ));
    }

    let current = find(catalog, id)?;
    let (name, price, category_id) = changes.apply(&current);

    catalog
        .update_product(id, &name, price, category_id)
        .context("Failed to update product")?;

    output.success(&format!("Updated product #{}", id));
    if let Some(updated) = catalog.get_product(id)? {
        output.print_product(&updated);
    }
    Ok(())
}

/// Delete a product
pub fn delete(catalog: &Catalog, id: i64, yes: bool, output: &Output) -> Result<()> {
    let product = find(catalog, id)?;

    if output.should_prompt() && !yes {
        println!("Delete product: #{} {}", product.id, product.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    catalog
        .delete_product(id)
        .context("Failed to delete product")?;

    output.success(&format!("Deleted product #{}", id));
    Ok(())
}

fn find(catalog: &Catalog, id: i64) -> Result<ProductListing> {
    catalog
        .get_product(id)?
        .ok_or_else(|| anyhow!("Product not found: {}", id))
}
