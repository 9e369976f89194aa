use clap::{Args, Subcommand};

mod add;
mod list;
mod set_active;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List active properties
    List(list::ListPropertiesArgs),
    /// Show one active property
    Show(show::ShowPropertyArgs),
    /// Add a property to the catalog
    Add(add::AddPropertyArgs),
    /// Hide a property from the catalog or bring it back
    SetActive(set_active::SetActiveArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list::run(args).await,
        CatalogSubcommand::Show(args) => show::run(args).await,
        CatalogSubcommand::Add(args) => add::run(args).await,
        CatalogSubcommand::SetActive(args) => set_active::run(args).await,
    }
}
