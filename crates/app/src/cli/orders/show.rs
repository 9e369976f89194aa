use clap::Args;
use realty::orders::OrderUuid;
use realty_app::config::AppConfig;

use crate::cli::{
    connect,
    orders::ModeratorArgs,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct ShowOrderArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    moderator: ModeratorArgs,

    /// Order UUID
    order_uuid: OrderUuid,
}

pub(crate) async fn run(args: ShowOrderArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let details = ctx
        .lifecycle
        .get_order(args.moderator.actor(), args.order_uuid)
        .await
        .map_err(|error| format!("failed to load order {}: {error}", args.order_uuid))?;

    args.output.print(&details, output::order)
}
