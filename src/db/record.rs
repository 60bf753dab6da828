//! Record store abstraction shared by the mock and table-service stores.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppError;

/// An entity kept in a record store.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Input for `create`; the store assigns the id.
    type Draft: Send + 'static;
    /// Shallow-merge input for `update`.
    type Patch: Send + 'static;

    /// Table name in the table service.
    const TABLE: &'static str;
    /// Label used in error messages.
    const KIND: &'static str;
    /// Serialized field names usable as exact-match filters.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Build the stored record, filling defaults that depend on the current date.
    fn from_draft(id: String, draft: Self::Draft, today: NaiveDate) -> Self;

    /// Merge the supplied fields; fields absent from the patch are preserved.
    fn apply(&mut self, patch: Self::Patch);

    /// Record-level invariants, checked on the merged record before it is stored.
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Exact-match filter on one serialized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// Paging and filtering for `RecordStore::fetch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchQuery {
    pub limit: Option<usize>,
    pub offset: usize,
    pub filters: Vec<FieldFilter>,
}

impl FetchQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn paged(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self {
            limit,
            offset: offset.unwrap_or(0),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Reject filters on fields outside the record's field list.
    pub fn validate<T: Record>(&self) -> Result<(), AppError> {
        match self
            .filters
            .iter()
            .find(|f| !T::FIELDS.contains(&f.field.as_str()))
        {
            Some(bad) => Err(AppError::Validation(format!(
                "Cannot filter {} records by '{}'",
                T::KIND,
                bad.field
            ))),
            None => Ok(()),
        }
    }

    /// Whether a serialized record satisfies every filter.
    pub fn matches(&self, document: &serde_json::Value) -> bool {
        self.filters.iter().all(|f| {
            document.get(&f.field).and_then(serde_json::Value::as_str) == Some(f.value.as_str())
        })
    }

    /// Apply offset and limit to an already filtered sequence.
    pub fn page<T>(&self, records: Vec<T>) -> Vec<T> {
        let skipped = records.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

/// CRUD over one entity's collection.
///
/// Every call is atomic with respect to other calls on the same store and calls are served
/// in issue order. Callers always receive copies.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Records matching the query's filters, in insertion order, paged.
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<T>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<T>, AppError>;

    async fn create(&self, draft: T::Draft) -> Result<T, AppError>;

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T, AppError>;

    /// Remove and return the record.
    async fn delete(&self, id: &str) -> Result<T, AppError>;

    async fn get_all(&self) -> Result<Vec<T>, AppError> {
        self.fetch(&FetchQuery::all()).await
    }
}
