use clap::Args;
use realty::properties::{NewProperty, PropertyKind, PropertyUuid};
use realty_app::config::AppConfig;
use rust_decimal::Decimal;

use crate::cli::{
    connect,
    output::{self, OutputArgs},
};

#[derive(Debug, Args)]
pub(crate) struct AddPropertyArgs {
    #[command(flatten)]
    config: AppConfig,

    #[command(flatten)]
    output: OutputArgs,

    /// Display name
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Price with at most two decimal places
    #[arg(long)]
    price: Decimal,

    /// Area with at most two decimal places
    #[arg(long)]
    area: Decimal,

    #[arg(long)]
    address: String,

    #[arg(long, default_value_t = 0)]
    rooms: u32,

    #[arg(long)]
    floor: Option<u32>,

    #[arg(long)]
    total_floors: Option<u32>,

    /// Category (apartment, house, commercial, land)
    #[arg(long)]
    kind: PropertyKind,

    /// Object key of the property image
    #[arg(long)]
    image_key: Option<String>,

    /// Optional property UUID; generated when omitted
    #[arg(long)]
    property_uuid: Option<PropertyUuid>,
}

pub(crate) async fn run(args: AddPropertyArgs) -> Result<(), String> {
    let ctx = connect(&args.config).await?;

    let listing = ctx
        .catalog
        .create_property(NewProperty {
            uuid: args.property_uuid.unwrap_or_default(),
            name: args.name,
            description: args.description,
            price: args.price,
            area: args.area,
            address: args.address,
            rooms: args.rooms,
            floor: args.floor,
            total_floors: args.total_floors,
            kind: args.kind,
            image_key: args.image_key,
        })
        .await
        .map_err(|error| format!("failed to add property: {error}"))?;

    args.output.print(&listing, output::listing)
}
