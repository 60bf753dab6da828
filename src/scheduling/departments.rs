//! Department creation and renaming with unique names.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};

/// Writes departments through the department store.
///
/// Department names are the join key for employees and shifts, so the name check and the
/// write that follows it run under one gate.
pub struct DepartmentRegistry {
    departments: Arc<dyn RecordStore<Department>>,
    gate: Mutex<()>,
}

impl DepartmentRegistry {
    pub fn new(departments: Arc<dyn RecordStore<Department>>) -> Self {
        Self {
            departments,
            gate: Mutex::new(()),
        }
    }

    pub async fn create(&self, request: CreateDepartmentRequest) -> Result<Department, AppError> {
        let _gate = self.gate.lock().await;
        self.ensure_unique_name(&request.name, None).await?;
        let department = self.departments.create(request).await?;
        tracing::info!("Department '{}' created", department.name);
        Ok(department)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateDepartmentRequest,
    ) -> Result<Department, AppError> {
        let _gate = self.gate.lock().await;
        if let Some(name) = &request.name {
            self.ensure_unique_name(name, Some(id)).await?;
        }
        self.departments.update(id, request).await
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        except_id: Option<&str>,
    ) -> Result<(), AppError> {
        let departments = self.departments.get_all().await?;
        let taken = departments
            .iter()
            .any(|d| d.name == name && Some(d.id.as_str()) != except_id);
        if taken {
            tracing::warn!("Rejected duplicate department name '{}'", name);
            return Err(AppError::Validation(format!(
                "Department '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::MemoryStore;

    fn named(name: &str) -> CreateDepartmentRequest {
        CreateDepartmentRequest {
            name: name.to_string(),
            minimum_staffing: Default::default(),
            current_staffing: 0,
            status: None,
        }
    }

    fn registry(latency: Duration) -> (DepartmentRegistry, Arc<dyn RecordStore<Department>>) {
        let store: Arc<dyn RecordStore<Department>> =
            Arc::new(MemoryStore::<Department>::new(Vec::new(), latency));
        (DepartmentRegistry::new(store.clone()), store)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_creates_keep_names_unique() {
        let (registry, store) = registry(Duration::from_millis(20));

        let (first, second) = tokio::join!(
            registry.create(named("Oncology")),
            registry.create(named("Oncology"))
        );

        let created = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(created, 1);
        assert!(
            matches!(first, Err(AppError::Validation(_)))
                || matches!(second, Err(AppError::Validation(_)))
        );
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_checks_other_departments_only() {
        let (registry, _) = registry(Duration::ZERO);
        let icu = registry.create(named("ICU")).await.unwrap();
        registry.create(named("Surgery")).await.unwrap();

        // Keeping its own name is not a clash
        let same = registry
            .update(
                &icu.id,
                UpdateDepartmentRequest {
                    name: Some("ICU".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.is_ok());

        let clash = registry
            .update(
                &icu.id,
                UpdateDepartmentRequest {
                    name: Some("Surgery".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(clash, Err(AppError::Validation(_))));
    }
}
