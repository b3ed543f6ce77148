//! Storefront CLI - run and operate the storefront review service.
//!
//! Commands:
//! - `storefront serve` - Run the HTTP API
//! - `storefront init` - Create the schema, optionally with demo data
//! - `storefront recompute` - Repair cached product ratings
//! - `storefront catalog` - List, add and toggle products
//! - `storefront messages` - Read contact form messages
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_observability::{init_logging, LogLevel};

use commands::{CatalogArgs, ConfigArgs, InitArgs, MessagesArgs, RecomputeArgs, ServeArgs};

/// Storefront CLI - product reviews and ratings service
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Create the database schema
    Init(InitArgs),

    /// Recompute cached ratings from stored reviews
    Recompute(RecomputeArgs),

    /// Manage the product catalog
    Catalog(CatalogArgs),

    /// List contact form messages
    Messages(MessagesArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let mut ctx = context::Context::load(cli.config.as_deref(), output)?;
    if cli.verbose {
        ctx.config.logging.level = LogLevel::Debug;
    }
    init_logging(&ctx.config.logging)?;
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &ctx).await,
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Recompute(args) => commands::recompute::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Messages(args) => commands::messages::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
