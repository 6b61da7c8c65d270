//! Shopping list CLI command.
//!
//! Builds an in-memory list from catalog items and custom input, then prints
//! the entries with running totals. The list is discarded on exit unless
//! `--save` is given.

use clap::Args;

use super::{truncate, OutputFormat};
use crate::config::Config;
use grocer_core::{
    CatalogRepository, Item, KeyValueStore, ShoppingListAggregator, ShoppingListRepository,
};

#[derive(Args)]
pub struct ShopCommand {
    /// Catalog item by ID or name, with optional quantity (e.g. "Eggs=3")
    #[arg(long = "item", value_name = "ITEM[=QTY]")]
    items: Vec<String>,

    /// Custom item added to the catalog too: "name,unit,price[,qty]"
    #[arg(long = "custom", value_name = "NAME,UNIT,PRICE[,QTY]")]
    custom: Vec<String>,

    /// Save the resulting list under this name
    #[arg(long)]
    save: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// A parsed `--custom` argument.
#[derive(Debug, PartialEq)]
struct CustomSpec<'a> {
    name: &'a str,
    unit: &'a str,
    price: &'a str,
    quantity: u32,
}

impl ShopCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        catalog: &CatalogRepository<S>,
        lists: &ShoppingListRepository<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let items = catalog.list_items().await;
        let mut list = ShoppingListAggregator::new();

        for spec in &self.items {
            let (identifier, quantity) = parse_item_spec(spec)?;
            let item = find_item(&items, identifier)
                .ok_or_else(|| format!("Item not found: {}", identifier))?;
            let id = list.add_from_catalog(item).id().to_string();
            list.set_quantity(&id, quantity);
        }

        for spec in &self.custom {
            let custom = parse_custom_spec(spec)?;
            let added = list
                .add_custom(catalog, custom.name, custom.unit, custom.price)
                .await?;
            if let Some(e) = &added.catalog_error {
                eprintln!(
                    "Warning: '{}' was added to the list but not saved to the catalog: {}",
                    added.item.name, e
                );
            }
            list.set_quantity(added.entry.id(), custom.quantity);
        }

        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "entries": list.entries(),
                    "totals": list.compute_totals(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => print_list(&list, config),
        }

        if let Some(name) = &self.save {
            if list.is_empty() {
                return Err("Nothing to save: the shopping list is empty".into());
            }
            let saved = list.snapshot(name.trim());
            lists.try_add_list(saved.clone()).await?;
            println!("\nSaved list '{}' [{}]", saved.name, saved.id);
        }

        Ok(())
    }
}

/// Finds a catalog item by exact id, then by case-insensitive name.
fn find_item<'a>(items: &'a [Item], identifier: &str) -> Option<&'a Item> {
    items.iter().find(|i| i.id == identifier).or_else(|| {
        let wanted = identifier.to_lowercase();
        items.iter().find(|i| i.name.to_lowercase() == wanted)
    })
}

/// Splits "ITEM[=QTY]" into the identifier and a quantity (default 1).
fn parse_item_spec(spec: &str) -> Result<(&str, u32), String> {
    match spec.rsplit_once('=') {
        Some((identifier, qty)) => {
            let quantity = parse_quantity(qty)?;
            Ok((identifier.trim(), quantity))
        }
        None => Ok((spec.trim(), 1)),
    }
}

/// Splits "name,unit,price[,qty]".
fn parse_custom_spec(spec: &str) -> Result<CustomSpec<'_>, String> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    match parts[..] {
        [name, unit, price] => Ok(CustomSpec {
            name,
            unit,
            price,
            quantity: 1,
        }),
        [name, unit, price, qty] => Ok(CustomSpec {
            name,
            unit,
            price,
            quantity: parse_quantity(qty)?,
        }),
        _ => Err(format!(
            "Invalid custom item '{}'. Use NAME,UNIT,PRICE[,QTY].",
            spec
        )),
    }
}

fn parse_quantity(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid quantity '{}'", raw))
}

fn print_list(list: &ShoppingListAggregator, config: &Config) {
    if list.is_empty() {
        println!("Your shopping list is empty");
        return;
    }

    println!(
        "{:<24}  {:>5}  {:>14}  {:<10}  {:>14}",
        "ITEM", "QTY", "PRICE", "UNIT", "TOTAL"
    );
    println!("{}", "-".repeat(76));
    for entry in list.entries() {
        println!(
            "{:<24}  {:>5}  {:>14}  {:<10}  {:>14}",
            truncate(entry.name(), 24),
            entry.quantity(),
            config.money(entry.price()),
            truncate(entry.unit(), 10),
            config.money(entry.total())
        );
    }

    let totals = list.compute_totals();
    println!("{}", "-".repeat(76));
    println!(
        "{} item(s), {} unit(s), total {}",
        totals.entry_count,
        totals.total_quantity,
        config.money(totals.total_amount)
    );
}
