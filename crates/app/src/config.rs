//! Application Config

use clap::Args;
use realty::catalog::DEFAULT_PAGE_SIZE;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Property image settings.
#[derive(Debug, Clone, Args)]
pub struct ImageConfig {
    /// Object storage endpoint serving property images; listings carry no
    /// image URL when unset
    #[arg(long, env = "IMAGE_ENDPOINT")]
    pub image_endpoint: Option<String>,

    /// Bucket holding property images
    #[arg(long, env = "IMAGE_BUCKET", default_value = "properties")]
    pub image_bucket: String,
}

/// Settings shared by every command that talks to the application.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Listings per catalog page
    #[arg(
        long,
        env = "CATALOG_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub catalog_page_size: u32,

    #[command(flatten)]
    pub images: ImageConfig,
}
