//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use realty::{
    access::UserUuid,
    orders::{Order, OrderLine, OrderLineUuid, OrderUuid},
};
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::Db,
    repositories::{
        Expected, LineWrite, OrderFilter, OrderSnapshot, OrdersRepository, RepositoryError,
    },
};

use super::records::{OrderLineRecord, OrderRecord, to_sql_count};

const CREATE_DRAFT_SQL: &str = include_str!("sql/create_draft.sql");
const FIND_DRAFT_SQL: &str = include_str!("sql/find_draft.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const CLAIM_ORDER_SQL: &str = include_str!("sql/claim_order.sql");
const UPSERT_ORDER_LINE_SQL: &str = include_str!("sql/upsert_order_line.sql");
const DELETE_ORDER_LINE_SQL: &str = include_str!("sql/delete_order_line.sql");
const RENUMBER_ORDER_LINES_SQL: &str = include_str!("sql/renumber_order_lines.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const UPDATE_LINE_PRICES_SQL: &str = include_str!("sql/update_line_prices.sql");
const MARK_DELETED_SQL: &str = include_str!("sql/mark_deleted.sql");

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Compare-and-swap on the order row. Holds the row lock until `tx` ends.
    async fn claim(
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        expected: Expected,
    ) -> Result<(), RepositoryError> {
        query_scalar::<Postgres, i64>(CLAIM_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(expected.status.as_str())
            .bind(expected.revision)
            .fetch_optional(&mut **tx)
            .await?
            .map(|_revision| ())
            .ok_or(RepositoryError::Conflict)
    }

    async fn upsert_line(
        tx: &mut Transaction<'_, Postgres>,
        line: &OrderLine,
    ) -> Result<(), RepositoryError> {
        query(UPSERT_ORDER_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(line.order.into_uuid())
            .bind(line.property.into_uuid())
            .bind(to_sql_count(line.quantity)?)
            .bind(to_sql_count(line.position)?)
            .bind(line.is_primary)
            .bind(line.discount_percent)
            .bind(line.unit_price)
            .bind(line.final_price)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn remove_line(
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: OrderLineUuid,
        renumbered: &[OrderLine],
    ) -> Result<(), RepositoryError> {
        let rows_affected = query(DELETE_ORDER_LINE_SQL)
            .bind(line.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        let uuids: Vec<Uuid> = renumbered.iter().map(|line| line.uuid.into_uuid()).collect();
        let positions = renumbered
            .iter()
            .map(|line| to_sql_count(line.position))
            .collect::<Result<Vec<i32>, _>>()?;
        let primary: Vec<bool> = renumbered.iter().map(|line| line.is_primary).collect();

        query(RENUMBER_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .bind(uuids)
            .bind(positions)
            .bind(primary)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn get_or_create_draft(&self, candidate: Order) -> Result<Order, RepositoryError> {
        let mut tx = self.db.begin().await?;

        query(CREATE_DRAFT_SQL)
            .bind(candidate.uuid.into_uuid())
            .bind(SqlxTimestamp::from(candidate.created_at))
            .bind(candidate.creator.into_uuid())
            .execute(&mut *tx)
            .await?;

        // Either our insert or the draft that beat it.
        let draft = query_as::<Postgres, OrderRecord>(FIND_DRAFT_SQL)
            .bind(candidate.creator.into_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::Conflict)?;

        tx.commit().await?;

        Ok(draft.order)
    }

    async fn find_draft(&self, creator: UserUuid) -> Result<Option<Order>, RepositoryError> {
        let draft = query_as::<Postgres, OrderRecord>(FIND_DRAFT_SQL)
            .bind(creator.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(draft.map(|record| record.order))
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderSnapshot, RepositoryError> {
        let mut tx = self.db.begin_snapshot().await?;

        let record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut *tx)
            .await?;

        let lines = query_as::<Postgres, OrderLineRecord>(GET_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderSnapshot {
            order: record.order,
            lines: lines.into_iter().map(|line| line.0).collect(),
            revision: record.revision,
        })
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let records = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.creator.map(UserUuid::into_uuid))
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(self.db.pool())
            .await?;

        Ok(records.into_iter().map(|record| record.order).collect())
    }

    async fn write_lines(
        &self,
        order: OrderUuid,
        expected: Expected,
        write: LineWrite,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await?;

        Self::claim(&mut tx, order, expected).await?;

        match write {
            LineWrite::Upsert(line) => {
                if line.order != order {
                    return Err(RepositoryError::InvalidReference);
                }

                Self::upsert_line(&mut tx, &line).await?;
            }
            LineWrite::Remove { line, renumbered } => {
                Self::remove_line(&mut tx, order, line, &renumbered).await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    async fn save_order(
        &self,
        order: &Order,
        expected: Expected,
        lines: &[OrderLine],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = query(UPDATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(expected.status.as_str())
            .bind(expected.revision)
            .bind(order.status.as_str())
            .bind(order.formed_at.map(SqlxTimestamp::from))
            .bind(order.completed_at.map(SqlxTimestamp::from))
            .bind(order.moderator.map(UserUuid::into_uuid))
            .bind(order.client.name.as_deref())
            .bind(order.client.phone.as_deref())
            .bind(order.client.email.as_deref())
            .bind(order.client.payment_method.map(|method| method.as_str()))
            .bind(order.total_price)
            .bind(order.estimated_delivery_date.map(SqlxDate::from))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::Conflict);
        }

        if !lines.is_empty() {
            let uuids: Vec<Uuid> = lines.iter().map(|line| line.uuid.into_uuid()).collect();
            let unit_prices: Vec<Decimal> = lines.iter().map(|line| line.unit_price).collect();
            let final_prices: Vec<Decimal> = lines.iter().map(|line| line.final_price).collect();

            query(UPDATE_LINE_PRICES_SQL)
                .bind(order.uuid.into_uuid())
                .bind(uuids)
                .bind(unit_prices)
                .bind(final_prices)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn mark_deleted(&self, order: OrderUuid) -> Result<(), RepositoryError> {
        let rows_affected = query(MARK_DELETED_SQL)
            .bind(order.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::Conflict);
        }

        Ok(())
    }
}
