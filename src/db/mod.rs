//! Record stores for employees, departments, shifts and leave requests.
//!
//! Two interchangeable implementations sit behind [`RecordStore`]: a seeded in-memory mock
//! and a SQLite table service. Which one backs the API is chosen from configuration.

mod fixtures;
mod memory;
pub mod queries;
mod record;
mod sqlite;

pub use memory::MemoryStore;
pub use record::*;
pub use sqlite::SqliteStore;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{Config, StoreKind};
use crate::errors::AppError;
use crate::models::{Department, Employee, LeaveRequest, Shift};

/// One record store per entity, shared by every handler.
#[derive(Clone)]
pub struct Stores {
    pub employees: Arc<dyn RecordStore<Employee>>,
    pub departments: Arc<dyn RecordStore<Department>>,
    pub shifts: Arc<dyn RecordStore<Shift>>,
    pub leave_requests: Arc<dyn RecordStore<LeaveRequest>>,
}

impl Stores {
    /// Build the stores selected by configuration.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.store {
            StoreKind::Memory => Self::mock(config.mock_latency),
            StoreKind::Sqlite => {
                let pool = init_database(&config.db_path).await?;
                Ok(Self::sqlite(pool, config.request_timeout))
            }
        }
    }

    /// In-memory stores seeded from the bundled mock data.
    pub fn mock(latency: Duration) -> Result<Self, AppError> {
        Ok(Self {
            employees: Arc::new(MemoryStore::new(fixtures::employees()?, latency)),
            departments: Arc::new(MemoryStore::new(fixtures::departments()?, latency)),
            shifts: Arc::new(MemoryStore::new(fixtures::shifts()?, latency)),
            leave_requests: Arc::new(MemoryStore::new(fixtures::leave_requests()?, latency)),
        })
    }

    /// Empty in-memory stores without latency.
    pub fn empty() -> Self {
        Self {
            employees: Arc::new(MemoryStore::<Employee>::empty()),
            departments: Arc::new(MemoryStore::<Department>::empty()),
            shifts: Arc::new(MemoryStore::<Shift>::empty()),
            leave_requests: Arc::new(MemoryStore::<LeaveRequest>::empty()),
        }
    }

    /// Table service stores sharing one connection pool.
    pub fn sqlite(pool: SqlitePool, timeout: Duration) -> Self {
        Self {
            employees: Arc::new(SqliteStore::<Employee>::new(pool.clone(), timeout)),
            departments: Arc::new(SqliteStore::<Department>::new(pool.clone(), timeout)),
            shifts: Arc::new(SqliteStore::<Shift>::new(pool.clone(), timeout)),
            leave_requests: Arc::new(SqliteStore::<LeaveRequest>::new(pool, timeout)),
        }
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create one document table per entity.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in [
        <Employee as Record>::TABLE,
        <Department as Record>::TABLE,
        <Shift as Record>::TABLE,
        <LeaveRequest as Record>::TABLE,
    ] {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                modified_at TEXT NOT NULL
            );
            "#
        );
        sqlx::query(&ddl).execute(pool).await?;
    }

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_shift_date ON shift(json_extract(data, '$.date'));
        CREATE INDEX IF NOT EXISTS idx_employee_department ON employee(json_extract(data, '$.department'));
        CREATE INDEX IF NOT EXISTS idx_leave_request_status ON leave_request(json_extract(data, '$.status'));
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
