use clap::Args;
use realty::properties::PropertyUuid;
use realty_app::config::AppConfig;

use crate::cli::{
    connect,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct ShowPropertyArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    /// Property UUID
    property_uuid: PropertyUuid,
}

pub(crate) async fn run(args: ShowPropertyArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let listing = ctx
        .catalog
        .get_property(args.property_uuid)
        .await
        .map_err(|error| format!("failed to load property {}: {error}", args.property_uuid))?;

    args.output.print(&listing, output::listing)
}
