//! # GearCrate CLI
//!
//! Command-line interface for the GearCrate inventory manager.
//!
//! ## Commands
//!
//! - `gearcrate search <query>` - Token search over the whole item catalog
//! - `gearcrate inventory` - List owned items
//! - `gearcrate count <name> <n>` - Set how many of an item you own
//! - `gearcrate sets` - Gear set completion overview
//! - `gearcrate init-config` - Write a default configuration file
//! - `gearcrate interactive` - Start interactive TUI mode
//!
//! ## Example Usage
//!
//! ```bash
//! # Find all black ADP pieces
//! gearcrate search adp black
//!
//! # Show more results per search from now on
//! gearcrate limit 50
//!
//! # Sets with three of four pieces owned
//! gearcrate sets --filter 3
//! ```

mod app;
mod commands;
mod tui;

use clap::{Parser, Subcommand};
use gearcrate_core::gear_sets::CompletionFilter;
use gearcrate_core::inventory::{SortKey, SortOrder};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GearCrate - Inventory manager for game equipment
#[derive(Parser)]
#[command(name = "gearcrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "GEARCRATE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the item catalog
    Search {
        /// Search terms; every term must occur in the item name
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results to show (defaults to the saved limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List owned items
    Inventory {
        /// Sort column (name, count, date); saved for next time
        #[arg(short, long)]
        sort: Option<SortKey>,

        /// Sort direction (asc, desc); saved for next time
        #[arg(long)]
        order: Option<SortOrder>,

        /// Only show one category ("all" clears the saved filter)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,

        /// Narrow the listing with search terms
        #[arg(short = 'q', long)]
        filter: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one item
    Item {
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Add an item, or increase the count of an existing one
    Add {
        name: String,

        /// Item category (Helmet, Torso, Arms, Legs, ...)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// How many to add
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Set the owned count of an item
    Count {
        name: String,

        /// New count, or a relative change such as +2 / -1
        #[arg(allow_hyphen_values = true)]
        count: String,
    },

    /// Replace the notes of an item (empty text clears them)
    Notes { name: String, text: String },

    /// Mark an item as favorite
    Favorite {
        name: String,

        /// Remove the mark instead
        #[arg(long)]
        off: bool,
    },

    /// Delete an item from the database
    Delete {
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show catalog statistics
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List categories that hold owned items
    Categories,

    /// Show gear sets and their completion
    Sets {
        /// Show one set in detail
        name: Option<String>,

        /// Variant of the set to show
        #[arg(short = 'V', long)]
        variant: Option<String>,

        /// Completion filter (all, favorites, none, 1, 2, 3, all-parts); saved for next time
        #[arg(short, long)]
        filter: Option<CompletionFilter>,

        /// Toggle the favorite mark of the given set variant
        #[arg(long, requires_all = ["name", "variant"])]
        toggle_favorite: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show or change the number of displayed search results
    Limit {
        value: Option<usize>,

        /// Go back to the default of 25
        #[arg(long, conflicts_with = "value")]
        reset: bool,
    },

    /// Show or change the UI language (de, en, fr, es)
    Lang { code: Option<String> },

    /// Set every item count to zero
    ClearInventory {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a configuration file with default values
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Start interactive TUI mode
    #[command(alias = "i")]
    Interactive,
}

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        commands::init::run(cli.config.as_deref(), force)?;
        return Ok(());
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => gearcrate_core::Config::load_from(path)?,
        None => gearcrate_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Search {
            query,
            limit,
            output,
        } => commands::search::run(config, &query.join(" "), limit, output),
        Commands::Inventory {
            sort,
            order,
            category,
            favorites,
            filter,
            output,
        } => commands::inventory::run(
            config,
            commands::inventory::Options {
                sort,
                order,
                category,
                favorites,
                filter,
            },
            output,
        ),
        Commands::Item { name, output } => commands::item::show(config, &name, output),
        Commands::Add {
            name,
            category,
            count,
            notes,
            image_url,
        } => commands::item::add(config, &name, category, count, notes, image_url),
        Commands::Count { name, count } => commands::item::count(config, &name, &count),
        Commands::Notes { name, text } => commands::item::notes(config, &name, &text),
        Commands::Favorite { name, off } => commands::item::favorite(config, &name, !off),
        Commands::Delete { name, yes } => commands::item::delete(config, &name, yes),
        Commands::Stats { output } => commands::stats::run(config, output),
        Commands::Categories => commands::inventory::categories(config),
        Commands::Sets {
            name,
            variant,
            filter,
            toggle_favorite,
            output,
        } => commands::sets::run(
            config,
            commands::sets::Options {
                name,
                variant,
                filter,
                toggle_favorite,
            },
            output,
        ),
        Commands::Limit { value, reset } => commands::prefs::limit(config, value, reset),
        Commands::Lang { code } => commands::prefs::lang(config, code.as_deref()),
        Commands::ClearInventory { yes } => commands::clear::run(config, yes),
        Commands::InitConfig { .. } => Ok(()),
        Commands::Interactive => tui::run(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_favorite_needs_set_and_variant() {
        assert!(Cli::try_parse_from(["gearcrate", "sets", "-V", "Black", "--toggle-favorite"]).is_err());
        assert!(Cli::try_parse_from(["gearcrate", "sets", "ADP", "--toggle-favorite"]).is_err());

        let cli =
            Cli::try_parse_from(["gearcrate", "sets", "ADP", "-V", "Black", "--toggle-favorite"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sets { toggle_favorite: true, ref name, .. } if name.as_deref() == Some("ADP")
        ));
    }

    #[test]
    fn test_init_config_parses_force() {
        let cli = Cli::try_parse_from(["gearcrate", "init-config", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::InitConfig { force: true }));
    }
}
