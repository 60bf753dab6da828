//! Leave request model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Record;
use crate::errors::AppError;

/// Leave request lifecycle state. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

/// A request for time off by one employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
    pub submitted_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Outcome of a leave decision, recorded by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveDecision {
    Approved {
        approver: String,
        approved_date: NaiveDate,
    },
    Rejected {
        approver: String,
        reason: String,
    },
}

/// Request body for creating a new leave request. New requests always start pending.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub submitted_date: Option<NaiveDate>,
}

/// Request body for updating the details of a leave request.
///
/// Status and decision fields are not accepted here; only the approval workflow sets them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaveRequest {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Store-level merge input for leave requests.
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestPatch {
    pub details: UpdateLeaveRequest,
    pub decision: Option<LeaveDecision>,
}

impl From<UpdateLeaveRequest> for LeaveRequestPatch {
    fn from(details: UpdateLeaveRequest) -> Self {
        Self {
            details,
            decision: None,
        }
    }
}

impl From<LeaveDecision> for LeaveRequestPatch {
    fn from(decision: LeaveDecision) -> Self {
        Self {
            details: UpdateLeaveRequest::default(),
            decision: Some(decision),
        }
    }
}

/// Reject a date range whose end precedes its start.
pub fn validate_leave_dates(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation(format!(
            "End date {} precedes start date {}",
            end, start
        )));
    }
    Ok(())
}

impl Record for LeaveRequest {
    type Draft = CreateLeaveRequest;
    type Patch = LeaveRequestPatch;

    const TABLE: &'static str = "leave_request";
    const KIND: &'static str = "Leave request";
    const FIELDS: &'static [&'static str] = &["employeeId", "status", "approver"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: Self::Draft, today: NaiveDate) -> Self {
        Self {
            id,
            employee_id: draft.employee_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            status: LeaveStatus::Pending,
            submitted_date: draft.submitted_date.unwrap_or(today),
            approver: None,
            approved_date: None,
            rejection_reason: None,
        }
    }

    fn apply(&mut self, patch: Self::Patch) {
        let details = patch.details;
        if let Some(employee_id) = details.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(start_date) = details.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = details.end_date {
            self.end_date = end_date;
        }
        if let Some(reason) = details.reason {
            self.reason = reason;
        }

        match patch.decision {
            Some(LeaveDecision::Approved {
                approver,
                approved_date,
            }) => {
                self.status = LeaveStatus::Approved;
                self.approver = Some(approver);
                self.approved_date = Some(approved_date);
            }
            Some(LeaveDecision::Rejected { approver, reason }) => {
                self.status = LeaveStatus::Rejected;
                self.approver = Some(approver);
                self.rejection_reason = Some(reason);
            }
            None => {}
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        validate_leave_dates(self.start_date, self.end_date)
    }
}
