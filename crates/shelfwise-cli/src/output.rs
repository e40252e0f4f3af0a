//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use shelfwise_core::{Category, CategoryNode, OutlineEntry, OutlineItem, Product, ProductListing};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a list of categories
    pub fn print_categories(&self, categories: &[Category]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    let parent = category
                        .parent_id
                        .map(|p| format!("#{}", p))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:>5} | {:<35} | {}",
                        category.id,
                        truncate(&category.name, 35),
                        parent
                    );
                }
                println!("\n{} category(ies)", categories.len());
            }
            OutputFormat::Json => self.json(categories),
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print the category forest
    pub fn print_category_tree(&self, forest: &[CategoryNode]) {
        match self.format {
            OutputFormat::Human => {
                if forest.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for line in render_tree(forest) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => self.json(forest),
            OutputFormat::Quiet => {
                let mut stack: Vec<&CategoryNode> = forest.iter().rev().collect();
                while let Some(node) = stack.pop() {
                    println!("{}", node.id);
                    stack.extend(node.children.iter().rev());
                }
            }
        }
    }

    /// Print a list of products
    pub fn print_products(&self, products: &[ProductListing]) {
        match self.format {
            OutputFormat::Human => {
                if products.is_empty() {
                    println!("No products found.");
                    return;
                }
                for product in products {
                    println!(
                        "{:>5} | {:<35} | {:>10} | {}",
                        product.id,
                        truncate(&product.name, 35),
                        format_price(product.price),
                        category_label(product)
                    );
                }
                println!("\n{} product(s)", products.len());
            }
            OutputFormat::Json => self.json(products),
            OutputFormat::Quiet => {
                for product in products {
                    println!("{}", product.id);
                }
            }
        }
    }

    /// Print a single product
    pub fn print_product(&self, product: &ProductListing) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", product.id);
                println!("Name:     {}", product.name);
                println!("Price:    {}", format_price(product.price));
                println!("Category: {}", category_label(product));
            }
            OutputFormat::Json => self.json(product),
            OutputFormat::Quiet => {
                println!("{}", product.id);
            }
        }
    }

    /// Print products that belong to one category (no category column)
    pub fn print_category_products(&self, products: &[Product]) {
        match self.format {
            OutputFormat::Human => {
                if products.is_empty() {
                    println!("No products found.");
                    return;
                }
                for product in products {
                    println!(
                        "{:>5} | {:<35} | {:>10}",
                        product.id,
                        truncate(&product.name, 35),
                        format_price(product.price)
                    );
                }
                println!("\n{} product(s)", products.len());
            }
            OutputFormat::Json => self.json(products),
            OutputFormat::Quiet => {
                for product in products {
                    println!("{}", product.id);
                }
            }
        }
    }

    /// Print the catalog outline
    pub fn print_outline(&self, outline: &[OutlineEntry]) {
        match self.format {
            OutputFormat::Human => {
                if outline.is_empty() {
                    println!("Catalog is empty.");
                    return;
                }
                for line in render_outline(outline) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => self.json(outline),
            OutputFormat::Quiet => {
                for entry in outline {
                    if let OutlineItem::Product { id, .. } = &entry.item {
                        println!("{}", id);
                    }
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the id of a newly created row
    pub fn created(&self, kind: &str, id: i64) {
        match self.format {
            OutputFormat::Human => println!("✓ Created {} #{}", kind, id),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": "success", "id": id}));
            }
            OutputFormat::Quiet => println!("{}", id),
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Draw the forest with box-drawing connectors, one line per category
pub fn render_tree(forest: &[CategoryNode]) -> Vec<String> {
    let mut lines = Vec::new();
    // (node, line prefix, connector)
    let mut stack: Vec<(&CategoryNode, String, &str)> = forest
        .iter()
        .rev()
        .map(|node| (node, String::new(), ""))
        .collect();

    while let Some((node, prefix, connector)) = stack.pop() {
        lines.push(format!("{}{}{} (#{})", prefix, connector, node.name, node.id));

        let child_prefix = match connector {
            "" => prefix,
            "├── " => format!("{}│   ", prefix),
            _ => format!("{}    ", prefix),
        };
        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate().rev() {
            let connector = if i == last { "└── " } else { "├── " };
            stack.push((child, child_prefix.clone(), connector));
        }
    }

    lines
}

/// Indent outline entries by depth
pub fn render_outline(outline: &[OutlineEntry]) -> Vec<String> {
    outline
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(entry.depth);
            match &entry.item {
                OutlineItem::Category { id, name } => format!("{}{} (#{})", indent, name, id),
                OutlineItem::Product { id, name, price } => {
                    format!("{}- {} {} (#{})", indent, name, format_price(*price), id)
                }
                OutlineItem::Uncategorized => format!("{}Uncategorized", indent),
            }
        })
        .collect()
}

fn category_label(product: &ProductListing) -> String {
    match (&product.category_name, product.category_id) {
        (Some(name), _) => name.clone(),
        (None, Some(id)) => format!("(missing #{})", id),
        (None, None) => "(none)".to_string(),
    }
}

fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
