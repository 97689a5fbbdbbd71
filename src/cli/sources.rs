//! Marketplace catalogue listing.

use std::path::Path;

use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::source::{SourceRegistry, SourceSelection};

#[derive(Tabled)]
struct MarketplaceRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Active")]
    active: &'static str,
    #[tabled(rename = "Search URL")]
    url: String,
}

/// List the built-in marketplaces and whether the current config queries them.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let selection = SourceSelection::from_names(&config.scan.marketplaces);

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Marketplaces");
    println!();

    let rows: Vec<MarketplaceRow> = SourceRegistry::catalogue(&config.sources)
        .into_iter()
        .map(|(name, url)| MarketplaceRow {
            name,
            active: if is_active(&selection, name) { "yes" } else { "no" },
            url,
        })
        .collect();
    output::lines(&Table::new(rows).to_string());

    println!();
    println!(
        "  Pick a subset with {}",
        output::highlight("flipscan run <terms> --marketplaces ebay,mercari")
    );
    println!();

    Ok(())
}

fn is_active(selection: &SourceSelection, name: &str) -> bool {
    match selection {
        SourceSelection::All => true,
        SourceSelection::Named(names) => names.iter().any(|n| n == name),
    }
}
