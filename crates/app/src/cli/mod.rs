use clap::{Parser, Subcommand};
use realty_app::{
    config::{AppConfig, LoggingConfig},
    context::AppContext,
};

mod catalog;
mod db;
mod orders;
mod output;

#[derive(Debug, Parser)]
#[command(name = "realty", about = "Realty order management CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Catalog(catalog::CatalogCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
        }
    }
}

async fn connect(config: &AppConfig) -> Result<AppContext, String> {
    AppContext::from_config(config)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))
}
