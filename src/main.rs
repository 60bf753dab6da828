//! Shiftboard Backend
//!
//! REST backend for the hospital shift scheduling dashboard, backed by either seeded mock
//! data or a SQLite table service.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod notifications;
mod scheduling;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, StoreKind};
use db::Stores;
use notifications::Notifier;
use scheduling::{DepartmentRegistry, LeaveWorkflow, Scheduler};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub scheduler: Arc<Scheduler>,
    pub departments: Arc<DepartmentRegistry>,
    pub leave: Arc<LeaveWorkflow>,
    pub notifier: Notifier,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(stores: Stores, config: Config) -> Self {
        let notifier = Notifier::default();
        let scheduler = Scheduler::new(
            stores.shifts.clone(),
            stores.employees.clone(),
            notifier.clone(),
        );
        let departments = DepartmentRegistry::new(stores.departments.clone());
        let leave = LeaveWorkflow::new(stores.leave_requests.clone(), notifier.clone());

        Self {
            stores,
            scheduler: Arc::new(scheduler),
            departments: Arc::new(departments),
            leave: Arc::new(leave),
            notifier,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shiftboard Backend");
    match config.store {
        StoreKind::Memory => tracing::info!(
            "Using mock store with {:?} simulated latency",
            config.mock_latency
        ),
        StoreKind::Sqlite => tracing::info!("Database path: {:?}", config.db_path),
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (SHIFTBOARD_API_PSK). Authentication is disabled!");
    }

    let stores = Stores::from_config(&config).await?;
    let bind_addr = config.bind_addr;
    let state = AppState::new(stores, config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Employees
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route("/employees/available", get(api::available_employees))
        .route(
            "/employees/{id}",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        )
        .route(
            "/employees/{id}/leave-requests",
            get(api::list_employee_leave_requests),
        )
        // Departments
        .route(
            "/departments",
            get(api::list_departments).post(api::create_department),
        )
        .route("/departments/staffing", get(api::list_department_staffing))
        .route(
            "/departments/{id}",
            get(api::get_department)
                .put(api::update_department)
                .delete(api::delete_department),
        )
        .route(
            "/departments/{id}/employees",
            get(api::list_department_employees),
        )
        .route("/departments/{id}/shifts", get(api::list_department_shifts))
        // Shifts
        .route("/shifts", get(api::list_shifts).post(api::create_shift))
        .route(
            "/shifts/{id}",
            get(api::get_shift)
                .put(api::update_shift)
                .delete(api::delete_shift),
        )
        .route("/shifts/{id}/eligible", get(api::list_eligible_employees))
        .route("/shifts/{id}/assignments", post(api::assign_employee))
        .route(
            "/shifts/{id}/assignments/{employee_id}",
            delete(api::remove_employee),
        )
        // Leave requests
        .route(
            "/leave-requests",
            get(api::list_leave_requests).post(api::create_leave_request),
        )
        .route(
            "/leave-requests/pending",
            get(api::list_pending_leave_requests),
        )
        .route(
            "/leave-requests/{id}",
            get(api::get_leave_request)
                .put(api::update_leave_request)
                .delete(api::delete_leave_request),
        )
        .route(
            "/leave-requests/{id}/approve",
            post(api::approve_leave_request),
        )
        .route(
            "/leave-requests/{id}/reject",
            post(api::reject_leave_request),
        )
        // Dashboard
        .route("/dashboard", get(api::get_dashboard))
        .route("/notifications", get(api::list_notifications))
        .route("/notifications/stream", get(api::stream_notifications))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
