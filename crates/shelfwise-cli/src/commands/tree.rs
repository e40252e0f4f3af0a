//! Tree command handler

use anyhow::Result;

use shelfwise_core::Catalog;

use crate::output::Output;

/// Show categories with their products interleaved
pub fn show(catalog: &Catalog, output: &Output) -> Result<()> {
    let outline = catalog.catalog_outline()?;
    output.print_outline(&outline);
    Ok(())
}
