//! quip CLI
//!
//! Command-line interface for quip - quote collection management.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quip_core::QuoteStore;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quip")]
#[command(about = "quip - quote collection management with remote sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new quote
    Add {
        /// The quote text
        text: String,
        /// Category for the quote
        #[arg(short, long)]
        category: String,
    },
    /// Show a random quote
    Show {
        /// Restrict to a category (overrides the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all categories
    Categories,
    /// Set the category filter used by `show` ("all" clears it)
    Filter {
        /// Category name, or "all"
        category: String,
    },
    /// Run one sync cycle against the remote source
    Sync,
    /// Sync periodically until interrupted
    Watch,
    /// Export all quotes to a JSON file
    Export {
        /// Destination file
        path: std::path::PathBuf,
    },
    /// Import quotes from a JSON file
    Import {
        /// Source file (JSON array of {text, category})
        path: std::path::PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (data location, counts, sync settings)
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, server_url, sync_enabled, sync_interval_secs)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let mut store = QuoteStore::open()?;

    match cli.command {
        Commands::Add { text, category } => {
            commands::quote::add(&mut store, &text, &category, &output)
        }
        Commands::Show { category } => commands::quote::show(&store, category.as_deref(), &output),
        Commands::List { category } => commands::quote::list(&store, category.as_deref(), &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Filter { category } => commands::category::select(&store, &category, &output),
        Commands::Sync => commands::sync::sync(store, &output).await,
        Commands::Watch => commands::sync::watch(store, &output).await,
        Commands::Export { path } => commands::transfer::export(&store, &path, &output),
        Commands::Import { path } => commands::transfer::import(&mut store, &path, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
