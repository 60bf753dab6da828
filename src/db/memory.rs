//! In-memory mock record store with simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use super::record::{FetchQuery, Record, RecordStore};
use crate::errors::AppError;

/// Record store backed by a `Vec`, seeded once and never persisted.
///
/// The collection lock is held for the full call, including the simulated delay, so
/// calls complete in the order they were issued.
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
    latency: Duration,
}

impl<T: Record> MemoryStore<T> {
    pub fn new(records: Vec<T>, latency: Duration) -> Self {
        Self {
            records: Mutex::new(records),
            latency,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    async fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        let guard = self.records.lock().await;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        guard
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<T>, AppError> {
        query.validate::<T>()?;
        let records = self.lock().await;

        let mut matched = Vec::new();
        for record in records.iter() {
            if query.filters.is_empty() || query.matches(&serde_json::to_value(record)?) {
                matched.push(record.clone());
            }
        }
        Ok(query.page(matched))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let records = self.lock().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        let mut records = self.lock().await;
        let id = uuid::Uuid::new_v4().to_string();
        let record = T::from_draft(id, draft, Utc::now().date_naive());
        record.validate()?;
        records.push(record.clone());
        tracing::debug!("Created {} {}", T::KIND, record.id());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T, AppError> {
        let mut records = self.lock().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;

        // Merge into a copy so a rejected patch leaves the stored record untouched
        let mut merged = slot.clone();
        merged.apply(patch);
        merged.validate()?;
        *slot = merged.clone();

        tracing::debug!("Updated {} {}", T::KIND, id);
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> Result<T, AppError> {
        let mut records = self.lock().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;
        tracing::debug!("Deleted {} {}", T::KIND, id);
        Ok(records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use super::*;
    use crate::models::{
        CreateEmployeeRequest, CreateLeaveRequest, Employee, LeaveRequest, UpdateEmployeeRequest,
        UpdateLeaveRequest,
    };

    fn draft(name: &str, department: &str) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: name.to_string(),
            role: "Nurse".to_string(),
            department: department.to_string(),
            certifications: BTreeSet::new(),
            availability: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_update_then_get_reflects_merge() {
        let store = MemoryStore::<Employee>::empty();
        let created = store.create(draft("Dana", "ICU")).await.unwrap();

        let updated = store
            .update(
                &created.id,
                UpdateEmployeeRequest {
                    department: Some("Emergency".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(updated, fetched);
        assert_eq!(fetched.department, "Emergency");
        assert_eq!(fetched.name, "Dana");
        assert_eq!(fetched.role, "Nurse");
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let store = MemoryStore::<Employee>::empty();
        let created = store.create(draft("Dana", "ICU")).await.unwrap();

        let removed = store.delete(&created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(store.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::<Employee>::empty();
        let result = store
            .update("nope", UpdateEmployeeRequest::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rejected_merge_leaves_record_unchanged() {
        let store = MemoryStore::<LeaveRequest>::empty();
        let date = |day| chrono::NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let created = store
            .create(CreateLeaveRequest {
                employee_id: "3".into(),
                start_date: date(10),
                end_date: date(12),
                reason: "Conference".into(),
                submitted_date: None,
            })
            .await
            .unwrap();

        // Moving only the end date is checked against the stored start date
        let result = store
            .update(
                &created.id,
                UpdateLeaveRequest {
                    end_date: Some(date(8)),
                    reason: Some("Shortened".into()),
                    ..Default::default()
                }
                .into(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let stored = store.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);

        let inverted = store
            .create(CreateLeaveRequest {
                employee_id: "3".into(),
                start_date: date(12),
                end_date: date(10),
                reason: String::new(),
                submitted_date: None,
            })
            .await;
        assert!(matches!(inverted, Err(AppError::Validation(_))));
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_returns_snapshot() {
        let store = MemoryStore::<Employee>::empty();
        store.create(draft("Dana", "ICU")).await.unwrap();

        let mut snapshot = store.get_all().await.unwrap();
        snapshot[0].name = "Changed".into();
        snapshot.clear();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Dana");
    }

    #[tokio::test]
    async fn test_fetch_filters_and_pages() {
        let store = MemoryStore::<Employee>::empty();
        for (name, department) in [("A", "ICU"), ("B", "Surgery"), ("C", "ICU"), ("D", "ICU")] {
            store.create(draft(name, department)).await.unwrap();
        }

        let icu = store
            .fetch(&FetchQuery::paged(Some(2), Some(1)).filter("department", "ICU"))
            .await
            .unwrap();
        let names: Vec<_> = icu.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "D"]);

        let bad = store
            .fetch(&FetchQuery::all().filter("certifications", "ICU"))
            .await;
        assert!(matches!(bad, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_calls_complete_in_issue_order() {
        let store = Arc::new(MemoryStore::<Employee>::new(
            Vec::new(),
            Duration::from_millis(5),
        ));

        let mut handles = Vec::new();
        for i in 0..5 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(draft(&format!("N{}", i), "ICU")).await.unwrap()
            }));
            // Let the task queue on the lock before issuing the next one
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let names: Vec<_> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["N0", "N1", "N2", "N3", "N4"]);
    }
}
