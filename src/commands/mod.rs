mod config_cmd;
mod item;
mod lists;
mod seed;
mod shop;

use clap::ValueEnum;
use std::io::{self, Write};

pub use config_cmd::ConfigCommand;
pub use item::ItemCommand;
pub use lists::ListsCommand;
pub use seed::SeedCommand;
pub use shop::ShopCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Asks a y/N question on stdin. Anything but "y" means no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Shortens a name to fit a column.
fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let kept: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}
