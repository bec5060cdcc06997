//! CLI configuration

use std::path::PathBuf;

use bazaar::{payments::SubscriptionPeriod, persistence::CART_STORAGE_KEY};
use clap::{Args, Parser, Subcommand};

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
    #[arg(long, env = "BAZAAR_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "BAZAAR_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Bazaar cart CLI
#[derive(Debug, Parser)]
#[command(name = "bazaar", about = "Bazaar cart CLI", long_about = None)]
pub(crate) struct Config {
    /// Directory holding the persisted cart
    #[arg(long, env = "BAZAAR_DATA_DIR", default_value = ".bazaar", global = true)]
    pub data_dir: PathBuf,

    /// Service catalog YAML file
    #[arg(
        long,
        env = "BAZAAR_CATALOG",
        default_value = "fixtures/services/marketing.yml",
        global = true
    )]
    pub catalog: PathBuf,

    /// Storage key of the cart slot
    #[arg(long, env = "BAZAAR_CART_KEY", default_value = CART_STORAGE_KEY, global = true)]
    pub cart_key: String,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the services in the catalog
    Services,

    /// Add a service to the cart
    Add(AddArgs),

    /// Remove a service from the cart
    Remove {
        /// Service id
        service_id: String,
    },

    /// Set the quantity of a service; zero or less removes it
    Update {
        /// Service id
        service_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,

    /// Show the cart with its totals
    Show,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Service id
    pub service_id: String,

    /// Buy as a subscription billed at this period
    #[arg(long, value_enum)]
    pub subscription: Option<SubscriptionPeriod>,
}

impl Config {
    /// Load configuration from `.env`, the environment and CLI arguments
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
