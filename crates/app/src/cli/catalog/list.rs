use clap::Args;
use realty::catalog::SortOrder;
use realty_app::{config::AppConfig, domain::catalog::models::ListingRequest};

use crate::cli::{
    connect,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct ListPropertiesArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    /// Case-insensitive search over name, address and description
    #[arg(long)]
    search: Option<String>,

    /// Listing order (default, price_asc, price_desc, area_desc)
    #[arg(long, default_value_t = SortOrder::Default)]
    sort: SortOrder,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,
}

pub(crate) async fn run(args: ListPropertiesArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let page = ctx
        .catalog
        .list_properties(ListingRequest {
            search: args.search,
            sort: args.sort,
            page: args.page,
        })
        .await
        .map_err(|error| format!("failed to list properties: {error}"))?;

    args.output.print(&page, output::listings)
}
