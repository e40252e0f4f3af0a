//! Shelfwise CLI
//!
//! Command-line interface for Shelfwise - categories and products management.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use shelfwise_core::{Catalog, CatalogError, Config};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelfwise")]
#[command(about = "Shelfwise - Product catalog with nested categories")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Show the catalog: categories with their products
    Tree,
    /// Show status (database location, counts)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a new category
    #[command(alias = "create")]
    Add {
        /// Category name (must be unique)
        name: String,
        /// Parent category ID
        #[arg(short, long)]
        parent: Option<i64>,
    },
    /// List all categories
    #[command(alias = "ls")]
    List,
    /// Show category details (path, subcategories, products)
    Show {
        /// Category ID
        id: i64,
    },
    /// Rename or move a category
    Edit {
        /// Category ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New parent category ID
        #[arg(short, long, conflicts_with = "root")]
        parent: Option<i64>,
        /// Move the category to the top level
        #[arg(long)]
        root: bool,
    },
    /// Delete an empty category
    #[command(alias = "rm")]
    Delete {
        /// Category ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the category hierarchy
    Tree,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Create a new product
    #[command(alias = "create")]
    Add {
        /// Product name
        name: String,
        /// Unit price
        price: f64,
        /// Category ID
        #[arg(short, long)]
        category: Option<i64>,
    },
    /// List products
    #[command(alias = "ls")]
    List {
        /// Only products directly in this category
        #[arg(short, long)]
        category: Option<i64>,
    },
    /// Show product details
    Show {
        /// Product ID
        id: i64,
    },
    /// Edit a product
    Edit {
        /// Product ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New price
        #[arg(short, long)]
        price: Option<f64>,
        /// New category ID
        #[arg(short, long, conflicts_with = "uncategorized")]
        category: Option<i64>,
        /// Remove the product from its category
        #[arg(long)]
        uncategorized: bool,
    },
    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, database_file, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the database
    let command = match cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command, config_path, &output);
        }
        other => other,
    };

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let catalog = Catalog::open_with_config(config)?;
    logging::init(catalog.config());

    let result = match command {
        Some(Commands::Category { command }) => handle_category_command(command, &catalog, &output),
        Some(Commands::Product { command }) => handle_product_command(command, &catalog, &output),
        Some(Commands::Status) => commands::status::show(&catalog, &output),
        Some(Commands::Tree) | Some(Commands::Config { .. }) | None => {
            commands::tree::show(&catalog, &output)
        }
    };

    if let Err(ref e) = result {
        tracing::warn!("Command failed: {:#}", e);
        let hint = e
            .downcast_ref::<CatalogError>()
            .and_then(CatalogError::recovery_suggestion);
        if let Some(hint) = hint {
            if !output.is_quiet() {
                eprintln!("Hint: {}", hint);
            }
        }
    }

    result
}

fn handle_category_command(
    command: CategoryCommands,
    catalog: &Catalog,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Add { name, parent } => {
            commands::category::add(catalog, name, parent, output)
        }
        CategoryCommands::List => commands::category::list(catalog, output),
        CategoryCommands::Show { id } => commands::category::show(catalog, id, output),
        CategoryCommands::Edit {
            id,
            name,
            parent,
            root,
        } => commands::category::edit(catalog, id, name, parent, root, output),
        CategoryCommands::Delete { id, yes } => {
            commands::category::delete(catalog, id, yes, output)
        }
        CategoryCommands::Tree => commands::category::tree(catalog, output),
    }
}

fn handle_product_command(
    command: ProductCommands,
    catalog: &Catalog,
    output: &Output,
) -> Result<()> {
    match command {
        ProductCommands::Add {
            name,
            price,
            category,
        } => commands::product::add(catalog, name, price, category, output),
        ProductCommands::List { category } => commands::product::list(catalog, category, output),
        ProductCommands::Show { id } => commands::product::show(catalog, id, output),
        ProductCommands::Edit {
            id,
            name,
            price,
            category,
            uncategorized,
        } => {
            let changes = commands::product::ProductChanges {
                name,
                price,
                category: if uncategorized {
                    Some(None)
                } else {
                    category.map(Some)
                },
            };
            commands::product::edit(catalog, id, changes, output)
        }
        ProductCommands::Delete { id, yes } => commands::product::delete(catalog, id, yes, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
