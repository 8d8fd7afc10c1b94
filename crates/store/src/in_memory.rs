use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::table::{Filter, Order, Row, StoreError, TableStore};

/// In-memory table store.
///
/// Intended for tests/dev. Not optimized for performance; scans every row of a
/// table per call, like a small remote table would behave from the caller's
/// point of view.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`. Test support.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
            (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
            (JsonValue::Number(x), JsonValue::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            // ISO dates and identities sort correctly as plain strings.
            (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

fn sort_rows(rows: &mut [Row], order: &Order) {
    match order {
        Order::Unordered => {}
        Order::Asc(column) => {
            rows.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }
        Order::Desc(column) => {
            rows.sort_by(|a, b| compare_values(b.get(column), a.get(column)));
        }
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn fetch_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| filter.matches(row)).cloned()))
    }

    async fn fetch_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        sort_rows(&mut rows, &order);
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let mut matched = 0u64;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}
