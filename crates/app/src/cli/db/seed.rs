use clap::Args;
use realty_app::{config::AppConfig, seed};
use tracing::info;

use crate::cli::connect;

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    #[command(flatten)]
    config: AppConfig,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let created = seed::seed_catalog(ctx.catalog.as_ref())
        .await
        .map_err(|error| format!("failed to seed catalog: {error}"))?;

    for listing in &created {
        info!(
            property = %listing.property.uuid,
            name = %listing.property.name,
            "added demo property"
        );
    }

    println!("{} demo properties added", created.len());

    Ok(())
}
