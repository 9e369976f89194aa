//! Row decoding for catalog and order records.

use std::{error::Error as StdError, str::FromStr};

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use realty::{
    access::UserUuid,
    orders::{ClientDetails, Order, OrderLine, OrderLineUuid, OrderUuid},
    properties::{Property, PropertyUuid},
};
use sqlx::{FromRow, Row, postgres::PgRow};

use crate::repositories::RepositoryError;

/// Property row.
#[derive(Debug)]
pub(crate) struct PropertyRecord(pub(crate) Property);

/// Order row with its revision.
#[derive(Debug)]
pub(crate) struct OrderRecord {
    pub(crate) order: Order,
    pub(crate) revision: i64,
}

/// Order line row.
#[derive(Debug)]
pub(crate) struct OrderLineRecord(pub(crate) OrderLine);

impl<'r> FromRow<'r, PgRow> for PropertyRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Property {
            uuid: PropertyUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            area: row.try_get("area")?,
            address: row.try_get("address")?,
            rooms: try_get_count(row, "rooms")?,
            floor: try_get_optional_count(row, "floor")?,
            total_floors: try_get_optional_count(row, "total_floors")?,
            kind: try_get_parsed(row, "kind")?,
            active: row.try_get("active")?,
            image_key: row.try_get("image_key")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method = row
            .try_get::<Option<String>, _>("payment_method")?
            .map(|value| value.parse())
            .transpose()
            .map_err(|error| decode_error("payment_method", error))?;

        let order = Order {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            status: try_get_parsed(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            formed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("formed_at")?
                .map(SqlxTimestamp::to_jiff),
            completed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("completed_at")?
                .map(SqlxTimestamp::to_jiff),
            creator: UserUuid::from_uuid(row.try_get("creator_uuid")?),
            moderator: row
                .try_get::<Option<uuid::Uuid>, _>("moderator_uuid")?
                .map(UserUuid::from_uuid),
            client: ClientDetails {
                name: row.try_get("client_name")?,
                phone: row.try_get("client_phone")?,
                email: row.try_get("client_email")?,
                payment_method,
            },
            total_price: row.try_get("total_price")?,
            estimated_delivery_date: row
                .try_get::<Option<SqlxDate>, _>("estimated_delivery_date")?
                .map(SqlxDate::to_jiff),
        };

        Ok(Self {
            order,
            revision: row.try_get("revision")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(OrderLine {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            property: PropertyUuid::from_uuid(row.try_get("property_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            position: try_get_count(row, "position")?,
            is_primary: row.try_get("is_primary")?,
            discount_percent: row.try_get("discount_percent")?,
            unit_price: row.try_get("unit_price")?,
            final_price: row.try_get("final_price")?,
        }))
    }
}

/// Encode a count for an `INTEGER` column.
pub(crate) fn to_sql_count(value: u32) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|error| RepositoryError::from(sqlx::Error::Encode(Box::new(error))))
}

pub(crate) fn to_sql_optional_count(value: Option<u32>) -> Result<Option<i32>, RepositoryError> {
    value.map(to_sql_count).transpose()
}

fn decode_error<E>(column: &str, source: E) -> sqlx::Error
where
    E: StdError + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

fn try_get_count(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|error| decode_error(column, error))
}

fn try_get_optional_count(row: &PgRow, column: &str) -> sqlx::Result<Option<u32>> {
    row.try_get::<Option<i32>, _>(column)?
        .map(u32::try_from)
        .transpose()
        .map_err(|error| decode_error(column, error))
}

fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|error| decode_error(column, error))
}
