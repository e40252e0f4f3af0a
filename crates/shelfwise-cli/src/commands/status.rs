//! Status command handler

use anyhow::Result;

use shelfwise_core::Catalog;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(catalog: &Catalog, output: &Output) -> Result<()> {
    let stats = catalog.stats()?;
    let db = catalog.database();
    let config = catalog.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": {
                        "path": db.path(),
                        "exists": db.exists(),
                        "size": db.size_bytes()
                    },
                    "counts": stats
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", db.path().display());
        }
        OutputFormat::Human => {
            println!("Shelfwise Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", db.path().display());
            println!("  Size:     {}", human_size(db.size_bytes()));
            println!();
            println!("Contents:");
            println!(
                "  Categories: {} ({} top level)",
                stats.categories, stats.root_categories
            );
            println!(
                "  Products:   {} ({} uncategorized)",
                stats.products, stats.uncategorized_products
            );
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
