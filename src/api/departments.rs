//! Department API endpoints.

use axum::extract::{Path, State};

use super::{require_non_empty, success, ApiJson, ApiResult};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{CreateDepartmentRequest, Department, Employee, UpdateDepartmentRequest};
use crate::scheduling::{department_staffing, resolve_shifts, DepartmentStaffing, ShiftView};
use crate::AppState;

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    success(state.stores.departments.get_all().await?)
}

/// GET /api/departments/staffing - Staffing level of every department.
pub async fn list_department_staffing(
    State(state): State<AppState>,
) -> ApiResult<Vec<DepartmentStaffing>> {
    let departments = state.stores.departments.get_all().await?;
    let employees = state.stores.employees.get_all().await?;
    success(department_staffing(&departments, &employees))
}

/// GET /api/departments/:id - Get a single department.
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    success(load_department(&state, &id).await?)
}

/// GET /api/departments/:id/employees - Employees whose home department this is.
pub async fn list_department_employees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Employee>> {
    let department = load_department(&state, &id).await?;
    let employees =
        queries::employees_by_department(state.stores.employees.as_ref(), &department.name)
            .await?;
    success(employees)
}

/// GET /api/departments/:id/shifts - Shifts staffed for this department.
pub async fn list_department_shifts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ShiftView>> {
    let department = load_department(&state, &id).await?;
    let shifts =
        queries::shifts_by_department(state.stores.shifts.as_ref(), &department.name).await?;
    let employees = state.stores.employees.get_all().await?;
    success(resolve_shifts(shifts, &employees))
}

/// POST /api/departments - Create a new department.
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    require_non_empty(&request.name, "Name")?;
    success(state.departments.create(request).await?)
}

/// PUT /api/departments/:id - Update a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateDepartmentRequest>,
) -> ApiResult<Department> {
    if let Some(name) = &request.name {
        require_non_empty(name, "Name")?;
    }

    success(state.departments.update(&id, request).await?)
}

/// DELETE /api/departments/:id - Delete a department.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    success(state.stores.departments.delete(&id).await?)
}

async fn load_department(state: &AppState, id: &str) -> Result<Department, AppError> {
    state
        .stores
        .departments
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))
}
