use clap::Args;

use super::OutputFormat;
use crate::config::Config;
use grocer_core::{KeyValueStore, SeedCoordinator, SeedOutcome};

#[derive(Args)]
pub struct SeedCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl SeedCommand {
    pub async fn run<S: KeyValueStore + 'static>(
        &self,
        seeder: &SeedCoordinator<S>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let outcome = seeder.seed_if_empty().await;

        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "seeded": outcome.was_seeded(),
                    "items": outcome.items(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => match &outcome {
                SeedOutcome::Seeded(items) => {
                    println!("Seeded {} default item(s):", items.len());
                    for item in items {
                        println!(
                            "  - {} ({}) {}",
                            item.name,
                            item.unit,
                            config.money(item.price_per_unit)
                        );
                    }
                }
                SeedOutcome::Existing(items) => {
                    println!("Catalog already has {} item(s); nothing seeded.", items.len());
                }
                SeedOutcome::Failed => {}
            },
        }

        if outcome == SeedOutcome::Failed {
            return Err(format!(
                "Could not seed catalog in {}",
                config.data_dir.value.display()
            )
            .into());
        }
        Ok(())
    }
}
