use clap::Args;
use realty::orders::OrderUuid;
use realty_app::config::AppConfig;

use crate::cli::{
    connect,
    orders::ModeratorArgs,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct ModerateArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    moderator: ModeratorArgs,

    /// Order UUID
    order_uuid: OrderUuid,
}

pub(crate) async fn approve(args: ModerateArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let details = ctx
        .lifecycle
        .approve(args.moderator.actor(), args.order_uuid)
        .await
        .map_err(|error| format!("failed to approve order {}: {error}", args.order_uuid))?;

    args.output.print(&details, output::order)
}

pub(crate) async fn reject(args: ModerateArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let order = ctx
        .lifecycle
        .reject(args.moderator.actor(), args.order_uuid)
        .await
        .map_err(|error| format!("failed to reject order {}: {error}", args.order_uuid))?;

    args.output.print(&order, output::order_summary)
}

pub(crate) async fn delete(args: ModerateArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    ctx.lifecycle
        .soft_delete(args.moderator.actor(), args.order_uuid)
        .await
        .map_err(|error| format!("failed to delete order {}: {error}", args.order_uuid))?;

    println!("deleted order {}", args.order_uuid);

    Ok(())
}
