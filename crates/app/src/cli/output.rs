//! Table and JSON rendering for command output.

use clap::Args;
use realty::{
    catalog::Page,
    orders::{Order, OrderLine},
};
use realty_app::domain::{catalog::models::Listing, orders::models::OrderDetails};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

const NONE: &str = "-";

#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    /// Print `value` as JSON, or as the table `table` builds from it.
    pub(crate) fn print<T, F>(self, value: &T, table: F) -> Result<(), String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|error| format!("failed to encode output: {error}"))?;

            println!("{json}");
        } else {
            println!("{}", table(value));
        }

        Ok(())
    }
}

pub(crate) fn listings(page: &Page<Listing>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["UUID", "Name", "Kind", "Price", "Area", "Rooms", "Address"]);

    for listing in &page.items {
        let property = &listing.property;

        builder.push_record([
            property.uuid.to_string(),
            property.name.clone(),
            property.kind.to_string(),
            property.price.to_string(),
            property.area.to_string(),
            property.rooms.to_string(),
            property.address.clone(),
        ]);
    }

    let table = finish(builder, &[3, 4, 5]);

    format!(
        "{table}\npage {} of {} ({} properties)",
        page.page, page.pages, page.total
    )
}

pub(crate) fn listing(listing: &Listing) -> String {
    let property = &listing.property;

    let floor = match (property.floor, property.total_floors) {
        (Some(floor), Some(total)) => format!("{floor} / {total}"),
        (Some(floor), None) => floor.to_string(),
        (None, Some(total)) => format!("- / {total}"),
        (None, None) => NONE.to_string(),
    };

    let mut builder = Builder::default();

    builder.push_record(["Field", "Value"]);

    for (field, value) in [
        ("uuid", property.uuid.to_string()),
        ("name", property.name.clone()),
        ("description", property.description.clone()),
        ("kind", property.kind.to_string()),
        ("price", property.price.to_string()),
        ("area", property.area.to_string()),
        ("rooms", property.rooms.to_string()),
        ("floor", floor),
        ("address", property.address.clone()),
        ("active", property.active.to_string()),
        ("image", or_none(listing.image_url.clone())),
    ] {
        builder.push_record([field.to_string(), value]);
    }

    finish(builder, &[])
}

pub(crate) fn orders(orders: &[Order]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["UUID", "Status", "Created", "Creator", "Client", "Total"]);

    for order in orders {
        builder.push_record([
            order.uuid.to_string(),
            order.status.to_string(),
            order.created_at.to_string(),
            order.creator.to_string(),
            or_none(order.client.name.clone()),
            order.total_price.to_string(),
        ]);
    }

    finish(builder, &[5])
}

pub(crate) fn order(details: &OrderDetails) -> String {
    let order = &details.order;

    let mut summary = Builder::default();

    summary.push_record(["Field", "Value"]);

    for (field, value) in [
        ("uuid", order.uuid.to_string()),
        ("status", order.status.to_string()),
        ("created_at", order.created_at.to_string()),
        ("formed_at", or_none(order.formed_at)),
        ("completed_at", or_none(order.completed_at)),
        ("creator", order.creator.to_string()),
        ("moderator", or_none(order.moderator)),
        ("client_name", or_none(order.client.name.clone())),
        ("client_phone", or_none(order.client.phone.clone())),
        ("client_email", or_none(order.client.email.clone())),
        ("payment_method", or_none(order.client.payment_method)),
        ("total_price", order.total_price.to_string()),
        (
            "estimated_delivery_date",
            or_none(order.estimated_delivery_date),
        ),
    ] {
        summary.push_record([field.to_string(), value]);
    }

    format!("{}\n{}", finish(summary, &[]), order_lines(&details.lines))
}

pub(crate) fn order_summary(order: &Order) -> String {
    orders(std::slice::from_ref(order))
}

fn order_lines(lines: &[OrderLine]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["#", "Property", "Qty", "Unit price", "Discount %", "Final price"]);

    for line in lines {
        let position = if line.is_primary {
            format!("{} *", line.position)
        } else {
            line.position.to_string()
        };

        builder.push_record([
            position,
            line.property.to_string(),
            line.quantity.to_string(),
            line.unit_price.to_string(),
            line.discount_percent.to_string(),
            line.final_price.to_string(),
        ]);
    }

    finish(builder, &[2, 3, 4, 5])
}

fn finish(builder: Builder, numeric: &[usize]) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());

    for column in numeric {
        table.modify(Columns::one(*column), Alignment::right());
    }

    table.modify(Rows::first(), Alignment::center());

    table.to_string()
}

fn or_none<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NONE.to_string(), |value| value.to_string())
}
