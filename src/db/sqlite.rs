//! SQLite-backed table service store.
//!
//! Each entity lives in its own table as a JSON document keyed by id. Filters are evaluated
//! with `json_extract`, so only fields in the record's field list can be queried.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::record::{FetchQuery, Record, RecordStore};
use crate::errors::AppError;

/// Record store for one table of the table service.
pub struct SqliteStore<T> {
    pool: SqlitePool,
    gate: Mutex<()>,
    timeout: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteStore<T> {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self {
            pool,
            gate: Mutex::new(()),
            timeout,
            _record: PhantomData,
        }
    }
}

fn decode<T: Record>(row: &sqlx::sqlite::SqliteRow) -> Result<T, AppError> {
    let data: String = row.get("data");
    Ok(serde_json::from_str(&data)?)
}

#[async_trait]
impl<T: Record> RecordStore<T> for SqliteStore<T> {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<T>, AppError> {
        query.validate::<T>()?;
        let _gate = self.gate.lock().await;

        let mut sql = format!("SELECT data FROM {}", T::TABLE);
        for (i, _) in query.filters.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str("json_extract(data, ?) = ?");
        }
        sql.push_str(" ORDER BY seq LIMIT ? OFFSET ?");

        let mut statement = sqlx::query(&sql);
        for filter in &query.filters {
            statement = statement
                .bind(format!("$.{}", filter.field))
                .bind(filter.value.clone());
        }
        // SQLite treats a negative limit as unbounded
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        statement = statement.bind(limit).bind(query.offset as i64);

        let rows = timeout(self.timeout, statement.fetch_all(&self.pool)).await??;
        rows.iter().map(decode::<T>).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let _gate = self.gate.lock().await;
        let sql = format!("SELECT data FROM {} WHERE id = ?", T::TABLE);
        let row = timeout(
            self.timeout,
            sqlx::query(&sql).bind(id).fetch_optional(&self.pool),
        )
        .await??;

        row.as_ref().map(decode::<T>).transpose()
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        let _gate = self.gate.lock().await;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = T::from_draft(id, draft, now.date_naive());
        record.validate()?;
        let data = serde_json::to_string(&record)?;
        let now = now.to_rfc3339();

        let sql = format!(
            "INSERT INTO {} (id, data, created_at, modified_at) VALUES (?, ?, ?, ?)",
            T::TABLE
        );
        timeout(
            self.timeout,
            sqlx::query(&sql)
                .bind(record.id())
                .bind(&data)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool),
        )
        .await??;

        tracing::debug!("Created {} {}", T::KIND, record.id());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T, AppError> {
        let _gate = self.gate.lock().await;
        let select = format!("SELECT data FROM {} WHERE id = ?", T::TABLE);
        let update = format!(
            "UPDATE {} SET data = ?, modified_at = ? WHERE id = ?",
            T::TABLE
        );

        let write = async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query(&select)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            let mut record: T = row
                .as_ref()
                .map(decode::<T>)
                .transpose()?
                .ok_or_else(|| AppError::not_found(T::KIND, id))?;

            record.apply(patch);
            record.validate()?;
            let data = serde_json::to_string(&record)?;

            sqlx::query(&update)
                .bind(&data)
                .bind(Utc::now().to_rfc3339())
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            Ok::<T, AppError>(record)
        };

        let record = timeout(self.timeout, write).await??;
        tracing::debug!("Updated {} {}", T::KIND, id);
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<T, AppError> {
        let _gate = self.gate.lock().await;
        let select = format!("SELECT data FROM {} WHERE id = ?", T::TABLE);
        let delete = format!("DELETE FROM {} WHERE id = ?", T::TABLE);

        let remove = async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query(&select)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            let record: T = row
                .as_ref()
                .map(decode::<T>)
                .transpose()?
                .ok_or_else(|| AppError::not_found(T::KIND, id))?;

            sqlx::query(&delete).bind(id).execute(&mut *tx).await?;
            tx.commit().await?;

            Ok::<T, AppError>(record)
        };

        let record = timeout(self.timeout, remove).await??;
        tracing::debug!("Deleted {} {}", T::KIND, id);
        Ok(record)
    }
}
