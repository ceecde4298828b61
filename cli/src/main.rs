//! Form Builder CLI
//!
//! Command-line client for the form builder API and Prompt.io sync.
//!
//! # Usage
//!
//! ```bash
//! formbuilder forms list
//! formbuilder forms create --file signup.yaml
//! formbuilder forms embed-code 1 --callback-url https://hooks.example.com/in
//! formbuilder sync push
//! formbuilder config set api_url http://localhost:3000
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use output::OutputFormat;

mod commands;
mod config;
mod output;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "formbuilder")]
#[command(version)]
#[command(about = "Form Builder Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "FORMBUILDER_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Exchange forms with Prompt.io
    Sync {
        #[command(subcommand)]
        action: SyncCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// List all forms
    List,
    /// Get form details
    Get { id: u64 },
    /// Create a form from flags or a JSON/YAML file
    Create {
        #[arg(short, long, conflicts_with = "title")]
        file: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        callback_url: Option<String>,
    },
    /// Change a form's title, description or callback URL
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Empty string clears the stored URL
        #[arg(long)]
        callback_url: Option<String>,
    },
    /// Delete a form
    Delete { id: u64 },
    /// Print the iframe snippet for a form
    EmbedCode {
        id: u64,
        #[arg(long)]
        callback_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Show the forms stored on Prompt.io
    Pull,
    /// Replace the Prompt.io collection with the server's forms
    Push,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

/// API client and output format from the flags, then the profile settings.
fn connect(
    api_url: Option<String>,
    format: Option<OutputFormat>,
    path: &Path,
) -> anyhow::Result<(commands::ApiClient, OutputFormat)> {
    let settings = config::Config::load_from(path)?;

    let api_url = api_url
        .or(settings.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let format = format
        .or_else(|| settings.default_format.as_deref().and_then(|f| f.parse().ok()))
        .unwrap_or(OutputFormat::Table);

    Ok((commands::ApiClient::new(&api_url)?, format))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = config::Config::config_path(cli.profile.as_deref())?;

    match cli.command {
        Commands::Forms { action } => {
            let (client, format) = connect(cli.api_url, cli.format, &path)?;
            commands::forms::handle(action, &client, format).await
        }
        Commands::Sync { action } => {
            let (client, format) = connect(cli.api_url, cli.format, &path)?;
            let credentials = config::FileCredentialStore::new(path);
            commands::sync::handle(action, &client, &credentials, format).await
        }
        // Skips the settings load so a broken file can still be repaired.
        Commands::Config { action } => commands::config::handle(action, &path).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
