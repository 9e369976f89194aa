use clap::Args;
use realty::properties::PropertyUuid;
use realty_app::config::AppConfig;

use crate::cli::connect;

#[derive(Debug, Args)]
pub(crate) struct SetActiveArgs {
    #[command(flatten)]
    config: AppConfig,

    /// Property UUID
    property_uuid: PropertyUuid,

    /// Whether the property is listed and may be added to carts
    #[arg(long, action = clap::ArgAction::Set)]
    active: bool,
}

pub(crate) async fn run(args: SetActiveArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let property = ctx
        .catalog
        .set_property_active(args.property_uuid, args.active)
        .await
        .map_err(|error| format!("failed to update property {}: {error}", args.property_uuid))?;

    println!("property_uuid: {}", property.uuid);
    println!("active: {}", property.active);

    Ok(())
}
