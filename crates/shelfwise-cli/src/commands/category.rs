//! Category command handlers

use anyhow::{anyhow, Context, Result};

use shelfwise_core::{Catalog, Category};

use crate::output::{Output, OutputFormat};
use crate::prompt::confirm;

/// Create a new category
pub fn add(catalog: &Catalog, name: String, parent: Option<i64>, output: &Output) -> Result<()> {
    let id = catalog
        .add_category(&name, parent)
        .context("Failed to create category")?;

    output.created("category", id);
    Ok(())
}

/// List all categories
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    let categories = catalog.list_categories()?;
    output.print_categories(&categories);
    Ok(())
}

/// Show a category with its path, subcategories and products
pub fn show(catalog: &Catalog, id: i64, output: &Output) -> Result<()> {
    let category = find(catalog, id)?;
    let path = catalog.category_path(id)?;
    let subcategories = catalog.subcategories(id)?;
    let products = catalog.products_in_category(id)?;

    match output.format {
        OutputFormat::Json => {
            output.json(&serde_json::json!({
                "category": category,
                "path": path,
                "subcategories": subcategories,
                "products": products,
            }));
        }
        OutputFormat::Quiet => {
            println!("{}", category.id);
        }
        OutputFormat::Human => {
            println!("ID:     {}", category.id);
            println!("Name:   {}", category.name);
            println!("Path:   {}", path.join(" > "));
            match category.parent_id {
                Some(parent_id) => println!("Parent: #{}", parent_id),
                None => println!("Parent: (top level)"),
            }

            if !subcategories.is_empty() {
                println!();
                println!("── Subcategories ({}) ──", subcategories.len());
                for sub in &subcategories {
                    println!("#{} {}", sub.id, sub.name);
                }
            }

            if !products.is_empty() {
                println!();
                println!("── Products ({}) ──", products.len());
                for product in &products {
                    println!("#{} {} {:.2}", product.id, product.name, product.price);
                }
            }
        }
    }

    Ok(())
}

/// Rename and/or move a category
pub fn edit(
    catalog: &Catalog,
    id: i64,
    name: Option<String>,
    parent: Option<i64>,
    to_root: bool,
    output: &Output,
) -> Result<()> {
    let found = if to_root {
        if let Some(ref name) = name {
            catalog
                .update_category(id, Some(name.as_str()), None)
                .context("Failed to rename category")?;
        }
        catalog
            .move_category_to_root(id)
            .context("Failed to move category")?
    } else {
        catalog
            .update_category(id, name.as_deref(), parent)
            .context("Failed to update category")?
    };

    if !found {
        return Err(anyhow!("Category not found: {}", id));
    }

    output.success(&format!("Updated category #{}", id));
    Ok(())
}

/// Delete an empty category
pub fn delete(catalog: &Catalog, id: i64, yes: bool, output: &Output) -> Result<()> {
    let category = find(catalog, id)?;

    if output.should_prompt() && !yes {
        println!("Delete category: #{} {}", category.id, category.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    catalog
        .delete_category(id)
        .context("Failed to delete category")?;

    output.success(&format!("Deleted category #{}", id));
    Ok(())
}

/// Show the category hierarchy
pub fn tree(catalog: &Catalog, output: &Output) -> Result<()> {
    let forest = catalog.category_tree()?;
    output.print_category_tree(&forest);
    Ok(())
}

fn find(catalog: &Catalog, id: i64) -> Result<Category> {
    catalog
        .get_category(id)?
        .ok_or_else(|| anyhow!("Category not found: {}", id))
}
