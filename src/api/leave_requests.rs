//! Leave request API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{require_non_empty, success, ApiJson, ApiQuery, ApiResult};
use crate::db::{queries, FetchQuery};
use crate::errors::AppError;
use crate::models::{CreateLeaveRequest, LeaveRequest, UpdateLeaveRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListParams {
    pub employee_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub approver_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub approver_id: String,
    #[serde(default)]
    pub reason: String,
}

/// GET /api/leave-requests - List leave requests, optionally by employee.
pub async fn list_leave_requests(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LeaveListParams>,
) -> ApiResult<Vec<LeaveRequest>> {
    let mut query = FetchQuery::paged(params.limit, params.offset);
    if let Some(employee_id) = params.employee_id {
        query = query.filter("employeeId", employee_id);
    }
    success(state.stores.leave_requests.fetch(&query).await?)
}

/// GET /api/leave-requests/pending - Requests awaiting a decision.
pub async fn list_pending_leave_requests(
    State(state): State<AppState>,
) -> ApiResult<Vec<LeaveRequest>> {
    success(queries::pending_leave_requests(state.stores.leave_requests.as_ref()).await?)
}

/// GET /api/leave-requests/:id - Get a single leave request.
pub async fn get_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<LeaveRequest> {
    match state.stores.leave_requests.get_by_id(&id).await? {
        Some(request) => success(request),
        None => Err(AppError::not_found("Leave request", &id)),
    }
}

/// POST /api/leave-requests - File a new leave request. It always starts pending.
pub async fn create_leave_request(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateLeaveRequest>,
) -> ApiResult<LeaveRequest> {
    require_non_empty(&request.employee_id, "Employee id")?;

    success(state.stores.leave_requests.create(request).await?)
}

/// PUT /api/leave-requests/:id - Update the details of a leave request.
pub async fn update_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateLeaveRequest>,
) -> ApiResult<LeaveRequest> {
    if let Some(employee_id) = &request.employee_id {
        require_non_empty(employee_id, "Employee id")?;
    }

    success(state.stores.leave_requests.update(&id, request.into()).await?)
}

/// DELETE /api/leave-requests/:id - Delete a leave request.
pub async fn delete_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<LeaveRequest> {
    success(state.stores.leave_requests.delete(&id).await?)
}

/// POST /api/leave-requests/:id/approve - Approve a pending request.
pub async fn approve_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ApproveRequest>,
) -> ApiResult<LeaveRequest> {
    require_non_empty(&request.approver_id, "Approver id")?;
    success(state.leave.approve(&id, &request.approver_id).await?)
}

/// POST /api/leave-requests/:id/reject - Reject a pending request with a reason.
pub async fn reject_leave_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RejectRequest>,
) -> ApiResult<LeaveRequest> {
    require_non_empty(&request.approver_id, "Approver id")?;
    success(
        state
            .leave
            .reject(&id, &request.approver_id, &request.reason)
            .await?,
    )
}
