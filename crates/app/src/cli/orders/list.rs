use clap::Args;
use realty::orders::OrderStatus;
use realty_app::config::AppConfig;

use crate::cli::{
    connect,
    orders::ModeratorArgs,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    moderator: ModeratorArgs,

    /// Only orders in this status (draft, formed, completed, rejected)
    #[arg(long)]
    status: Option<OrderStatus>,
}

pub(crate) async fn run(args: ListOrdersArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let orders = ctx
        .lifecycle
        .list_orders(args.moderator.actor(), args.status)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    args.output.print(&orders, |orders| output::orders(orders))
}
