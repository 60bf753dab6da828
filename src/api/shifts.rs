//! Shift API endpoints.
//!
//! Shifts are returned as views with assigned staff resolved against the current employees.

use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{require_non_empty, success, ApiJson, ApiQuery, ApiResult};
use crate::db::FetchQuery;
use crate::errors::AppError;
use crate::models::{CreateShiftRequest, Employee, Shift, UpdateShiftRequest};
use crate::scheduling::{resolve_shift, resolve_shifts, ShiftView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ShiftListParams {
    pub date: Option<NaiveDate>,
    pub department: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub employee_id: String,
}

async fn view(state: &AppState, shift: Shift) -> ApiResult<ShiftView> {
    let employees = state.stores.employees.get_all().await?;
    success(resolve_shift(shift, &employees))
}

/// View of a shift that has already been written. Staff stay unresolved when the employee
/// lookup fails.
async fn committed_view(state: &AppState, shift: Shift) -> ApiResult<ShiftView> {
    match state.stores.employees.get_all().await {
        Ok(employees) => success(resolve_shift(shift, &employees)),
        Err(err) => {
            tracing::warn!("Could not resolve staff of shift {}: {}", shift.id, err);
            success(resolve_shift(shift, &[]))
        }
    }
}

/// GET /api/shifts - List shifts, optionally by date and department.
pub async fn list_shifts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ShiftListParams>,
) -> ApiResult<Vec<ShiftView>> {
    let mut query = FetchQuery::paged(params.limit, params.offset);
    if let Some(date) = params.date {
        query = query.filter("date", date.to_string());
    }
    if let Some(department) = params.department {
        query = query.filter("department", department);
    }

    let shifts = state.stores.shifts.fetch(&query).await?;
    let employees = state.stores.employees.get_all().await?;
    success(resolve_shifts(shifts, &employees))
}

/// GET /api/shifts/:id - Get a single shift.
pub async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ShiftView> {
    match state.stores.shifts.get_by_id(&id).await? {
        Some(shift) => view(&state, shift).await,
        None => Err(AppError::not_found("Shift", &id)),
    }
}

/// GET /api/shifts/:id/eligible - Employees that may be assigned to the shift.
pub async fn list_eligible_employees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Employee>> {
    success(state.scheduler.eligible_for(&id).await?)
}

/// POST /api/shifts - Create a new shift.
pub async fn create_shift(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateShiftRequest>,
) -> ApiResult<ShiftView> {
    require_non_empty(&request.department, "Department")?;
    require_non_empty(&request.start_time, "Start time")?;
    require_non_empty(&request.end_time, "End time")?;

    let shift = state.stores.shifts.create(request).await?;
    view(&state, shift).await
}

/// PUT /api/shifts/:id - Update a shift.
///
/// Staff lists written here bypass the eligibility checks of the assignment endpoints.
pub async fn update_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateShiftRequest>,
) -> ApiResult<ShiftView> {
    if let Some(department) = &request.department {
        require_non_empty(department, "Department")?;
    }

    let shift = state.stores.shifts.update(&id, request).await?;
    view(&state, shift).await
}

/// DELETE /api/shifts/:id - Delete a shift.
pub async fn delete_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Shift> {
    success(state.stores.shifts.delete(&id).await?)
}

/// POST /api/shifts/:id/assignments - Assign an employee to the shift.
pub async fn assign_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AssignmentRequest>,
) -> ApiResult<ShiftView> {
    if request.employee_id.trim().is_empty() {
        return Err(AppError::BadRequest("employeeId is required".to_string()));
    }

    let shift = state.scheduler.assign(&id, &request.employee_id).await?;
    committed_view(&state, shift).await
}

/// DELETE /api/shifts/:id/assignments/:employee_id - Remove an employee from the shift.
pub async fn remove_employee(
    State(state): State<AppState>,
    Path((id, employee_id)): Path<(String, String)>,
) -> ApiResult<ShiftView> {
    let shift = state.scheduler.remove(&id, &employee_id).await?;
    committed_view(&state, shift).await
}
