//! Leave approval workflow.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::{LeaveDecision, LeaveRequest};
use crate::notifications::{Notification, Notifier};

/// Moves leave requests out of `pending`. Decisions are final.
pub struct LeaveWorkflow {
    requests: Arc<dyn RecordStore<LeaveRequest>>,
    notifier: Notifier,
    gate: Mutex<()>,
}

impl LeaveWorkflow {
    pub fn new(requests: Arc<dyn RecordStore<LeaveRequest>>, notifier: Notifier) -> Self {
        Self {
            requests,
            notifier,
            gate: Mutex::new(()),
        }
    }

    pub async fn approve(&self, id: &str, approver_id: &str) -> Result<LeaveRequest, AppError> {
        self.decide(
            id,
            LeaveDecision::Approved {
                approver: approver_id.to_string(),
                approved_date: Utc::now().date_naive(),
            },
        )
        .await
    }

    pub async fn reject(
        &self,
        id: &str,
        approver_id: &str,
        reason: &str,
    ) -> Result<LeaveRequest, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }
        self.decide(
            id,
            LeaveDecision::Rejected {
                approver: approver_id.to_string(),
                reason: reason.to_string(),
            },
        )
        .await
    }

    async fn decide(&self, id: &str, decision: LeaveDecision) -> Result<LeaveRequest, AppError> {
        let _gate = self.gate.lock().await;

        let current = self
            .requests
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave request", id))?;
        if current.status.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Leave request {} is already {}",
                id,
                current.status.as_str()
            )));
        }

        let decided = self.requests.update(id, decision.into()).await?;

        self.notifier.emit(Notification::LeaveDecided {
            request_id: decided.id.clone(),
            status: decided.status,
        });
        Ok(decided)
    }
}
