use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{ConfigCommand, ItemCommand, ListsCommand, SeedCommand, ShopCommand};
use config::Config;
use grocer_core::{
    CatalogRepository, FileStore, SeedCoordinator, SeedOutcome, ShoppingListRepository,
};

#[derive(Parser)]
#[command(name = "grocer")]
#[command(version)]
#[command(about = "A grocery price catalog and shopping list CLI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog items and prices
    Item(ItemCommand),

    /// Build a shopping list and show totals
    Shop(ShopCommand),

    /// Write the default items if the catalog is empty
    Seed(SeedCommand),

    /// Manage saved shopping lists
    Lists(ListsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grocer=warn,grocer_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    tracing::debug!("Data directory: {}", config.data_dir.value.display());

    let store = Arc::new(FileStore::new(config.data_dir.value.clone()));
    let catalog = CatalogRepository::new(Arc::clone(&store));
    let seeder = SeedCoordinator::new(catalog.clone());

    // Seed BEFORE catalog and shopping commands, as on first launch
    if config.seed_on_start.value && needs_catalog(&cli.command) {
        if seeder.seed_if_empty().await == SeedOutcome::Failed {
            tracing::warn!("Default items could not be seeded");
        }
    }

    match cli.command {
        Some(Commands::Item(cmd)) => {
            cmd.run(&catalog, &config).await?;
        }
        Some(Commands::Shop(cmd)) => {
            let lists = ShoppingListRepository::new(store);
            cmd.run(&catalog, &lists, &config).await?;
        }
        Some(Commands::Seed(cmd)) => {
            cmd.run(&seeder, &config).await?;
        }
        Some(Commands::Lists(cmd)) => {
            let lists = ShoppingListRepository::new(store);
            cmd.run(&lists, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Returns true if the command reads the catalog.
fn needs_catalog(cmd: &Option<Commands>) -> bool {
    matches!(cmd, Some(Commands::Item(_)) | Some(Commands::Shop(_)))
}
