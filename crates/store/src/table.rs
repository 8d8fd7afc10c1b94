use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// One stored record: a flat JSON object keyed by column name.
pub type Row = serde_json::Map<String, JsonValue>;

/// Store operation error.
///
/// Infrastructure failures only (transport, backend, serialization); business
/// failures are decided by the caller from the returned data.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("row serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Row filter: a conjunction of equality clauses, optionally with one OR group.
///
/// These are exactly the shapes the lending flows issue against the backend:
/// `owner == X AND item_name == Y`, and for the archive listing
/// `returned == true AND (lender == me OR borrower == me)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    eq: Vec<(String, JsonValue)>,
    any_of: Vec<(String, JsonValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`.
    pub fn eq(mut self, column: &str, value: impl Into<JsonValue>) -> Self {
        self.eq.push((column.to_string(), value.into()));
        self
    }

    /// Require at least one of the given `column == value` alternatives.
    /// At most one OR group per filter; calling this again replaces it.
    pub fn any_of<I, V>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<JsonValue>,
    {
        self.any_of = alternatives
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.into()))
            .collect();
        self
    }

    pub fn eq_clauses(&self) -> &[(String, JsonValue)] {
        &self.eq
    }

    pub fn any_of_clauses(&self) -> &[(String, JsonValue)] {
        &self.any_of
    }

    /// Evaluate the filter against one row.
    pub fn matches(&self, row: &Row) -> bool {
        let eq_holds = self
            .eq
            .iter()
            .all(|(column, value)| row.get(column) == Some(value));

        let any_holds = self.any_of.is_empty()
            || self
                .any_of
                .iter()
                .any(|(column, value)| row.get(column) == Some(value));

        eq_holds && any_holds
    }
}

/// Result ordering for `fetch_many`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Unordered,
    Asc(String),
    Desc(String),
}

impl Order {
    pub fn desc(column: &str) -> Self {
        Self::Desc(column.to_string())
    }

    pub fn asc(column: &str) -> Self {
        Self::Asc(column.to_string())
    }
}

/// Remote tabular store seam.
///
/// Each method is one request/response round trip; the caller suspends on the
/// result and proceeds only once it arrives. There are no transactions across
/// calls and no retries inside the store; sequencing and compensation are the
/// caller's problem.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch the first row matching `filter`, if any.
    async fn fetch_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError>;

    /// Fetch all rows matching `filter`, ordered per `order`.
    async fn fetch_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError>;

    /// Insert one row; returns the row as stored.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Patch all rows matching `filter` field-wise; returns the matched count.
    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError>;

    /// Delete all rows matching `filter`; returns the removed count.
    ///
    /// The lending flows only use this for compensating rollback of a
    /// just-inserted ledger row.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> TableStore for Arc<S>
where
    S: TableStore + ?Sized,
{
    async fn fetch_one(&self, table: &str, filter: &Filter) -> Result<Option<Row>, StoreError> {
        (**self).fetch_one(table, filter).await
    }

    async fn fetch_many(
        &self,
        table: &str,
        filter: &Filter,
        order: Order,
    ) -> Result<Vec<Row>, StoreError> {
        (**self).fetch_many(table, filter, order).await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        (**self).insert(table, row).await
    }

    async fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<u64, StoreError> {
        (**self).update(table, filter, patch).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        (**self).delete(table, filter).await
    }
}

/// Serialize a typed record into a row. The value must serialize to an object.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Deserialize a row back into a typed record.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    serde_json::from_value(JsonValue::Object(row))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, JsonValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn eq_clauses_are_conjunctive() {
        let filter = Filter::new()
            .eq("owner", "alice")
            .eq("item_name", "Drill");

        assert!(filter.matches(&row(&[
            ("owner", json!("alice")),
            ("item_name", json!("Drill")),
            ("quantity", json!(3)),
        ])));
        assert!(!filter.matches(&row(&[
            ("owner", json!("alice")),
            ("item_name", json!("Ladder")),
        ])));
    }

    #[test]
    fn any_of_needs_one_alternative() {
        let filter = Filter::new()
            .eq("returned", true)
            .any_of([("lender", "me"), ("borrower", "me")]);

        assert!(filter.matches(&row(&[
            ("returned", json!(true)),
            ("lender", json!("someone")),
            ("borrower", json!("me")),
        ])));
        assert!(!filter.matches(&row(&[
            ("returned", json!(true)),
            ("lender", json!("someone")),
            ("borrower", json!("else")),
        ])));
    }

    #[test]
    fn missing_column_never_matches() {
        let filter = Filter::new().eq("owner", "alice");
        assert!(!filter.matches(&row(&[("item_name", json!("Drill"))])));
    }

    #[test]
    fn typed_round_trip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Rec {
            name: String,
            quantity: i64,
        }

        let rec = Rec {
            name: "Drill".to_string(),
            quantity: 2,
        };
        let row = to_row(&rec).unwrap();
        assert_eq!(row.get("quantity"), Some(&json!(2)));
        assert_eq!(from_row::<Rec>(row).unwrap(), rec);
    }

    #[test]
    fn to_row_rejects_non_objects() {
        let err = to_row(&42u8).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
