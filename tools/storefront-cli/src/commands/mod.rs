//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod init;
pub mod messages;
pub mod recompute;
pub mod serve;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seed demo data into an empty catalog before serving.
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Insert the demo catalog and reviews when the catalog is empty.
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for the recompute command.
#[derive(Args)]
pub struct RecomputeArgs {
    /// Only repair this product.
    #[arg(short, long)]
    pub product: Option<i64>,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: Option<CatalogCommand>,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products with their cached ratings.
    List,
    /// Add a product.
    Add {
        /// Product name.
        name: String,

        /// Category slug.
        #[arg(long)]
        category: String,

        /// Unit price.
        #[arg(short, long)]
        price: f64,

        /// Units in stock.
        #[arg(short, long, default_value = "0")]
        stock: i64,

        /// Marketing label.
        #[arg(short, long, default_value = "")]
        tag: String,

        /// Image URL.
        #[arg(long, default_value = "")]
        image: String,

        /// Listing description.
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Make a product orderable or not.
    Availability {
        /// Product id.
        id: i64,

        /// New state.
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

/// Arguments for the messages command.
#[derive(Args)]
pub struct MessagesArgs {
    #[command(subcommand)]
    pub command: Option<MessagesCommand>,

    /// Show at most this many messages.
    #[arg(short, long, default_value = "20")]
    pub limit: u32,
}

#[derive(Subcommand)]
pub enum MessagesCommand {
    /// List messages, newest first.
    List,
    /// Delete a message.
    Delete {
        /// Message id.
        id: i64,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default config file.
    Init {
        /// Where to write it.
        #[arg(long, default_value = "storefront.toml")]
        path: String,

        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a message id argument.
pub(crate) fn message_id(raw: i64) -> anyhow::Result<storefront_commerce::MessageId> {
    storefront_commerce::MessageId::parse_positive(raw)
        .ok_or_else(|| anyhow::anyhow!("Message id must be a positive integer, got {raw}"))
}

/// Parse a product id argument.
pub(crate) fn product_id(raw: i64) -> anyhow::Result<storefront_commerce::ProductId> {
    storefront_commerce::ProductId::parse_positive(raw)
        .ok_or_else(|| anyhow::anyhow!("Product id must be a positive integer, got {raw}"))
}
