//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use storefront::{catalog::SortOrder, products::ProductId};

use crate::actions::CartAction;

/// Storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog and cart ledger", long_about = None)]
pub(crate) struct Config {
    /// Fixture set settings.
    #[command(flatten)]
    pub fixtures: FixtureConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Fixture set settings.
#[derive(Debug, Args)]
pub(crate) struct FixtureConfig {
    /// Directory holding `products/`, `carts/` and `pricing/` fixtures
    #[arg(long, env = "STOREFRONT_FIXTURES_DIR", default_value = "./fixtures", global = true)]
    pub fixtures_dir: PathBuf,

    /// Fixture set name
    #[arg(short, long, env = "STOREFRONT_FIXTURE_SET", default_value = "storefront", global = true)]
    pub fixture_set: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List products, filtered and sorted
    Products(ProductsArgs),

    /// Show a product page with related products
    Product {
        /// Product id
        id: ProductId,
    },

    /// List categories
    Categories,

    /// List featured products
    Featured,

    /// Run cart actions and print the receipt
    Cart(CartArgs),

    /// Log in, run cart actions, print the receipt and log out
    Login(LoginArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Category to list, or "All"
    #[arg(short, long)]
    pub category: Option<String>,

    /// Search name, description and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Lowest effective price
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest effective price
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortOrder::Featured)]
    pub sort: SortOrder,
}

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Start from the fixture set's seeded cart
    #[arg(long)]
    pub seeded: bool,

    /// Actions: add:ID[:QTY], remove:ID, set:ID:QTY, inc:ID, dec:ID, coupon:CODE, clear
    pub actions: Vec<CartAction>,
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Cart settings and actions
    #[command(flatten)]
    pub cart: CartArgs,
}
