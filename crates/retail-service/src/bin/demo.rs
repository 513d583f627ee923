//! # Retail Demo
//!
//! Seeds a small catalogue, registers a member and runs one checkout that
//! asks for more of an item than is on the shelf.
//!
//! ## Usage
//! ```bash
//! # Defaults (or retail.toml from the platform config dir)
//! cargo run -p retail-service --bin retail-demo
//!
//! # Explicit config file
//! cargo run -p retail-service --bin retail-demo -- --config ./retail.toml
//! ```
//!
//! Prints the receipt as text and as pretty JSON.

use std::env;
use std::path::PathBuf;

use retail_core::{ItemSelection, Money};
use retail_service::{telemetry, RetailService, ServiceConfig};

/// Demo catalogue: (category, item, price, stock)
const CATALOGUE: &[(&str, &str, &str, i64)] = &[
    ("Beverages", "Cola 330ml", "1.25", 24),
    ("Beverages", "Orange Juice 1L", "3.49", 6),
    ("Snacks", "Chips Classic", "2.50", 12),
    ("Snacks", "Chocolate Bar", "1.10", 2),
    ("Tools", "Widget", "9.99", 1),
    ("Tools", "Hammer", "15.00", 3),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Retail Store Demo");
                println!();
                println!("Usage: retail-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = ServiceConfig::load(config_path)?;
    telemetry::init_tracing(&config.logging.filter);

    println!("{}", config.store.name);
    println!("{}", "=".repeat(config.store.name.chars().count()));

    let service = RetailService::new(config);

    for (category, name, price, stock) in CATALOGUE {
        let price: Money = price.parse()?;
        service.add_item(name, price, *stock, category)?;
    }
    println!("✓ Seeded {} items", service.list_items().len());

    for listing in service.list_categories()? {
        println!("  {} ({} items)", listing.name, listing.items.len());
    }

    service.create_member("Ann")?;
    println!("✓ Registered member Ann");

    // Widget has one unit on the shelf; the second selection comes up short
    let basket = [
        ItemSelection::new("Widget", 1),
        ItemSelection::new("Widget", 1),
        ItemSelection::new("Cola 330ml", 2),
        ItemSelection::new("Chocolate Bar", 2),
    ];
    let receipt = service.checkout("Ann", &basket)?;

    println!();
    print!("{}", service.render_receipt(&receipt));
    println!();
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    service.check_consistency()?;
    Ok(())
}
