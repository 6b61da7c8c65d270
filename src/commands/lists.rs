use clap::{Args, Subcommand};

use super::{confirm, truncate, OutputFormat};
use crate::config::Config;
use grocer_core::{KeyValueStore, ShoppingList, ShoppingListAggregator, ShoppingListRepository};

#[derive(Args)]
pub struct ListsCommand {
    #[command(subcommand)]
    pub command: ListsSubcommand,
}

#[derive(Subcommand)]
pub enum ListsSubcommand {
    /// List saved shopping lists
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a saved list with totals
    Show {
        /// List ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a saved list
    Delete {
        /// List ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ListsCommand {
    pub async fn run<S: KeyValueStore>(
        &self,
        repo: &ShoppingListRepository<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ListsSubcommand::List { format } => {
                let lists = repo.list_lists().await;

                if lists.is_empty() {
                    println!("No saved shopping lists");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&lists)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<36}  {:<20}  {:>7}  {:>14}",
                            "ID", "NAME", "ENTRIES", "TOTAL"
                        );
                        println!("{}", "-".repeat(84));
                        for list in &lists {
                            println!(
                                "{:<36}  {:<20}  {:>7}  {:>14}",
                                list.id,
                                truncate(&list.name, 20),
                                list.entries.len(),
                                config.money(list.total_amount())
                            );
                        }
                        println!("\nTotal: {} list(s)", lists.len());
                    }
                }
                Ok(())
            }

            ListsSubcommand::Show { id, format } => {
                let list = find(repo, id).await?;
                match format {
                    OutputFormat::Json => {
                        let totals = ShoppingListAggregator::from_list(&list).compute_totals();
                        let output = serde_json::json!({
                            "list": list,
                            "totals": totals,
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => print_list(&list, config),
                }
                Ok(())
            }

            ListsSubcommand::Delete { id, force } => {
                let list = find(repo, id).await?;

                if !force && !confirm(&format!("Delete list '{}'?", list.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                repo.try_delete_list(id).await?;
                println!("Deleted list: {}", list.name);
                Ok(())
            }
        }
    }
}

async fn find<S: KeyValueStore>(
    repo: &ShoppingListRepository<S>,
    id: &str,
) -> Result<ShoppingList, Box<dyn std::error::Error>> {
    repo.find_list(id)
        .await
        .ok_or_else(|| format!("Shopping list not found: {}", id).into())
}

fn print_list(list: &ShoppingList, config: &Config) {
    println!("{}", list.name);
    println!("{}", "=".repeat(list.name.len()));
    println!("Created: {}\n", list.created_at.format("%Y-%m-%d %H:%M"));

    for entry in &list.entries {
        println!("  - {:<24} {}", truncate(entry.name(), 24), entry);
    }

    let totals = ShoppingListAggregator::from_list(list).compute_totals();
    println!(
        "\n{} item(s), {} unit(s), total {}",
        totals.entry_count,
        totals.total_quantity,
        config.money(totals.total_amount)
    );
}
