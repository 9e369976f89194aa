//! Properties Repository

use async_trait::async_trait;
use realty::{
    catalog::{CatalogQuery, Page, PageWindow},
    properties::{Property, PropertyUuid},
};
use sqlx::{Postgres, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::Db,
    repositories::{PropertiesRepository, RepositoryError},
};

use super::records::{PropertyRecord, to_sql_count, to_sql_optional_count};

const COUNT_PROPERTIES_SQL: &str = include_str!("sql/count_properties.sql");
const LIST_PROPERTIES_SQL: &str = include_str!("sql/list_properties.sql");
const GET_PROPERTY_SQL: &str = include_str!("sql/get_property.sql");
const GET_PROPERTIES_SQL: &str = include_str!("sql/get_properties.sql");
const CREATE_PROPERTY_SQL: &str = include_str!("sql/create_property.sql");
const SET_PROPERTY_ACTIVE_SQL: &str = include_str!("sql/set_property_active.sql");

#[derive(Debug, Clone)]
pub struct PgPropertiesRepository {
    db: Db,
}

impl PgPropertiesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertiesRepository for PgPropertiesRepository {
    async fn list_properties(
        &self,
        query: &CatalogQuery,
    ) -> Result<Page<Property>, RepositoryError> {
        let pattern = query.search_term().map(like_pattern);

        let mut tx = self.db.begin_snapshot().await?;

        let total = query_scalar::<Postgres, i64>(COUNT_PROPERTIES_SQL)
            .bind(pattern.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let window = PageWindow::new(
            query.page,
            query.page_size,
            u64::try_from(total).unwrap_or_default(),
        );

        let items = query_as::<Postgres, PropertyRecord>(LIST_PROPERTIES_SQL)
            .bind(pattern.as_deref())
            .bind(query.sort.as_str())
            .bind(i64::from(window.page_size))
            .bind(i64::try_from(window.offset()).unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(window.into_page(items.into_iter().map(|record| record.0).collect()))
    }

    async fn get_property(&self, property: PropertyUuid) -> Result<Property, RepositoryError> {
        let record = query_as::<Postgres, PropertyRecord>(GET_PROPERTY_SQL)
            .bind(property.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(record.0)
    }

    async fn get_properties(
        &self,
        properties: &[PropertyUuid],
    ) -> Result<Vec<Property>, RepositoryError> {
        let uuids: Vec<Uuid> = properties.iter().map(|uuid| uuid.into_uuid()).collect();

        let records = query_as::<Postgres, PropertyRecord>(GET_PROPERTIES_SQL)
            .bind(uuids)
            .fetch_all(self.db.pool())
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    async fn create_property(&self, property: Property) -> Result<Property, RepositoryError> {
        let record = query_as::<Postgres, PropertyRecord>(CREATE_PROPERTY_SQL)
            .bind(property.uuid.into_uuid())
            .bind(&property.name)
            .bind(&property.description)
            .bind(property.price)
            .bind(property.area)
            .bind(&property.address)
            .bind(to_sql_count(property.rooms)?)
            .bind(to_sql_optional_count(property.floor)?)
            .bind(to_sql_optional_count(property.total_floors)?)
            .bind(property.kind.as_str())
            .bind(property.active)
            .bind(property.image_key.as_deref())
            .fetch_one(self.db.pool())
            .await?;

        Ok(record.0)
    }

    async fn set_property_active(
        &self,
        property: PropertyUuid,
        active: bool,
    ) -> Result<Property, RepositoryError> {
        let record = query_as::<Postgres, PropertyRecord>(SET_PROPERTY_ACTIVE_SQL)
            .bind(property.into_uuid())
            .bind(active)
            .fetch_one(self.db.pool())
            .await?;

        Ok(record.0)
    }
}

/// Wrap a search term for `ILIKE`, escaping its wildcards.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);

    pattern.push('%');

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');

    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("Tverskaya"), "%Tverskaya%");
    }
}
