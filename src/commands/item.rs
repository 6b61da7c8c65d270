use clap::{Args, Subcommand};

use super::{confirm, truncate, OutputFormat};
use crate::config::Config;
use grocer_core::{parse_price, CatalogRepository, Item, ItemPatch, KeyValueStore, NewItem};

#[derive(Args)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub command: ItemSubcommand,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// List all catalog items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an item to the catalog
    Add {
        /// Item name
        name: String,

        /// Unit (kg, pack, etc.)
        #[arg(long, short)]
        unit: String,

        /// Price per unit
        #[arg(long, short)]
        price: String,
    },

    /// Update an existing item
    Update {
        /// Item ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New unit
        #[arg(long)]
        unit: Option<String>,

        /// New price per unit
        #[arg(long)]
        price: Option<String>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ItemCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        catalog: &CatalogRepository<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ItemSubcommand::List { format } => {
                let items = catalog.list_items().await;

                if items.is_empty() {
                    println!("No items in database");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => print_items(&items, config),
                }
                Ok(())
            }

            ItemSubcommand::Add { name, unit, price } => {
                let item = NewItem::parse(name, unit, price)?.into_item();
                catalog.try_add_item(item.clone()).await?;
                println!("Added item: {}", format_item(&item, config));
                Ok(())
            }

            ItemSubcommand::Update {
                id,
                name,
                unit,
                price,
            } => {
                let patch = build_patch(name.as_deref(), unit.as_deref(), price.as_deref())?;
                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                if catalog.find_item(id).await.is_none() {
                    return Err(format!("Item not found: {}", id).into());
                }

                let items = catalog.try_update_item(id, &patch).await?;
                if let Some(updated) = items.iter().find(|i| &i.id == id) {
                    println!("Updated item: {}", format_item(updated, config));
                }
                Ok(())
            }

            ItemSubcommand::Delete { id, force } => {
                let item = match catalog.find_item(id).await {
                    Some(item) => item,
                    None => return Err(format!("Item not found: {}", id).into()),
                };

                // Confirm deletion unless --force is used
                if !force && !confirm(&format!("Delete item '{}'?", item.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                catalog.try_delete_item(id).await?;
                println!("Deleted item: {}", item.name);
                Ok(())
            }
        }
    }
}

/// Validates the provided update fields. Omitted fields stay unset.
fn build_patch(
    name: Option<&str>,
    unit: Option<&str>,
    price: Option<&str>,
) -> Result<ItemPatch, Box<dyn std::error::Error>> {
    let mut patch = ItemPatch::default();

    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err("Item name cannot be empty".into());
        }
        patch = patch.with_name(name.trim());
    }
    if let Some(unit) = unit {
        if unit.trim().is_empty() {
            return Err("Unit cannot be empty".into());
        }
        patch = patch.with_unit(unit.trim());
    }
    if let Some(price) = price {
        let value =
            parse_price(price).ok_or("Price must be a valid number greater than 0")?;
        patch = patch.with_price(value);
    }

    Ok(patch)
}

fn format_item(item: &Item, config: &Config) -> String {
    format!(
        "{} ({}) {} [{}]",
        item.name,
        item.unit,
        config.money(item.price_per_unit),
        item.id
    )
}

fn print_items(items: &[Item], config: &Config) {
    println!("{:<36}  {:<24}  {:<10}  PRICE", "ID", "NAME", "UNIT");
    println!("{}", "-".repeat(84));
    for item in items {
        println!(
            "{:<36}  {:<24}  {:<10}  {}",
            item.id,
            truncate(&item.name, 24),
            truncate(&item.unit, 10),
            config.money(item.price_per_unit)
        );
    }
    println!("\nTotal: {} item(s)", items.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_patch_trims_and_parses() {
        let patch = build_patch(Some(" Eggs "), None, Some("7.25")).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Eggs"));
        assert!(patch.unit.is_none());
        assert_eq!(patch.price_per_unit, Some(7.25));
    }

    #[test]
    fn test_build_patch_rejects_bad_values() {
        assert!(build_patch(Some("  "), None, None).is_err());
        assert!(build_patch(None, Some(""), None).is_err());
        assert!(build_patch(None, None, Some("free")).is_err());
        assert!(build_patch(None, None, Some("0")).is_err());
    }

    #[test]
    fn test_build_patch_empty() {
        assert!(build_patch(None, None, None).unwrap().is_empty());
    }
}
