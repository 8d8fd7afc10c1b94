//! Postgres-backed table store.
//!
//! Rows live in a single relation `lendbook_rows (tbl text, doc jsonb)` so the
//! store stays generic over table names, exactly like the remote service it
//! stands in for. Equality filters compile to jsonb containment (`doc @> ..`),
//! ordering to `doc->>col`. Each trait call is one statement; there are no
//! cross-call transactions, matching the remote-store contract.
//!
//! All sqlx errors are surfaced as `StoreError::Backend` with the driver
//! message; the reconciler decides what a failed call means for the flow.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres, QueryBuilder, Row as _};
use tracing::instrument;

use crate::table::{Filter, Order, Row, StoreError, TableStore};

/// Postgres-backed implementation of [`TableStore`].
///
/// Clone-cheap; the sqlx pool handles connection management and is safe to
/// share across tasks.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the backing relation exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS lendbook_rows (
                tbl text NOT NULL,
                doc jsonb NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS lendbook_rows_tbl_idx ON lendbook_rows (tbl)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(())
    }
}

fn containment(column: &str, value: &JsonValue) -> JsonValue {
    let mut object = serde_json::Map::new();
    object.insert(column.to_string(), value.clone());
    JsonValue::Object(object)
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    for (column, value) in filter.eq_clauses() {
        qb.push(" AND doc @> ");
        qb.push_bind(containment(column, value));
    }

    if !filter.any_of_clauses().is_empty() {
        qb.push(" AND (");
        for (i, (column, value)) in filter.any_of_clauses().iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("doc @> ");
            qb.push_bind(containment(column, value));
        }
        qb.push(")");
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, order: &Order) {
    match order {
        Order::Unordered => {}
        Order::Asc(column) => {
            qb.push(" ORDER BY doc->>");
            qb.push_bind(column.clone());
            qb.push(" ASC");
        }
        Order::Desc(column) => {
            qb.push(" ORDER BY doc->>");
            qb.push_bind(column.clone());
            qb.push(" DESC");
        }
    }
}

fn doc_to_row(doc: JsonValue) -> Result<Row, StoreError> {
    match doc {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "stored doc is not an object: {other}"
        ))),
    }
}

#[async_trait]
impl TableStore for PostgresStore {
    #[instrument(skip(self, filter), err)]
    async fn fetch_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError> {
        let mut qb = QueryBuilder::new("SELECT doc FROM lendbook_rows WHERE tbl = ");
        qb.push_bind(table);
        push_filter(&mut qb, filter);
        qb.push(" LIMIT 1");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        row.map(|r| {
            let doc: JsonValue = r
                .try_get("doc")
                .map_err(|e| StoreError::backend(e.to_string()))?;
            doc_to_row(doc)
        })
        .transpose()
    }

    #[instrument(skip(self, filter, order), err)]
    async fn fetch_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError> {
        let mut qb = QueryBuilder::new("SELECT doc FROM lendbook_rows WHERE tbl = ");
        qb.push_bind(table);
        push_filter(&mut qb, filter);
        push_order(&mut qb, &order);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        rows.into_iter()
            .map(|r| {
                let doc: JsonValue = r
                    .try_get("doc")
                    .map_err(|e| StoreError::backend(e.to_string()))?;
                doc_to_row(doc)
            })
            .collect()
    }

    #[instrument(skip(self, row), err)]
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        sqlx::query("INSERT INTO lendbook_rows (tbl, doc) VALUES ($1, $2)")
            .bind(table)
            .bind(JsonValue::Object(row.clone()))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(row)
    }

    #[instrument(skip(self, filter, patch), err)]
    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::new("UPDATE lendbook_rows SET doc = doc || ");
        qb.push_bind(JsonValue::Object(patch));
        qb.push(" WHERE tbl = ");
        qb.push_bind(table);
        push_filter(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, filter), err)]
    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::new("DELETE FROM lendbook_rows WHERE tbl = ");
        qb.push_bind(table);
        push_filter(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
