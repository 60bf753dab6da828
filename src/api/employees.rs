//! Employee API endpoints.

use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{require_non_empty, success, ApiJson, ApiQuery, ApiResult};
use crate::db::{queries, FetchQuery};
use crate::errors::AppError;
use crate::models::{CreateEmployeeRequest, Employee, LeaveRequest, UpdateEmployeeRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeListParams {
    pub department: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
    pub slot: String,
}

/// GET /api/employees - List employees, optionally by department.
pub async fn list_employees(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<EmployeeListParams>,
) -> ApiResult<Vec<Employee>> {
    let mut query = FetchQuery::paged(params.limit, params.offset);
    if let Some(department) = params.department {
        query = query.filter("department", department);
    }
    success(state.stores.employees.fetch(&query).await?)
}

/// GET /api/employees/available - Employees available for a time slot on a date.
pub async fn available_employees(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AvailabilityParams>,
) -> ApiResult<Vec<Employee>> {
    let employees =
        queries::available_employees(state.stores.employees.as_ref(), params.date, &params.slot)
            .await?;
    success(employees)
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    match state.stores.employees.get_by_id(&id).await? {
        Some(employee) => success(employee),
        None => Err(AppError::not_found("Employee", &id)),
    }
}

/// GET /api/employees/:id/leave-requests - Leave requests filed by one employee.
pub async fn list_employee_leave_requests(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<LeaveRequest>> {
    let requests =
        queries::leave_requests_by_employee(state.stores.leave_requests.as_ref(), &id).await?;
    success(requests)
}

/// POST /api/employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    require_non_empty(&request.name, "Name")?;
    require_non_empty(&request.department, "Department")?;

    success(state.stores.employees.create(request).await?)
}

/// PUT /api/employees/:id - Update an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    if let Some(name) = &request.name {
        require_non_empty(name, "Name")?;
    }
    if let Some(department) = &request.department {
        require_non_empty(department, "Department")?;
    }

    success(state.stores.employees.update(&id, request).await?)
}

/// DELETE /api/employees/:id - Delete an employee.
///
/// Shifts keep the id; it resolves to an unnamed staff member afterwards.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    success(state.stores.employees.delete(&id).await?)
}
