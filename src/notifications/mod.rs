//! Outcome notifications for assignment, removal and leave decisions.
//!
//! Every notification is logged, kept in a short history for the dashboard and broadcast to
//! live subscribers. Emitting never fails, even with no subscriber attached.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::LeaveStatus;

/// Number of notifications kept for `recent`.
const HISTORY_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Notification {
    AssignmentSucceeded {
        shift_id: String,
        employee_id: String,
        employee_name: String,
        department: String,
    },
    AssignmentFailed {
        shift_id: String,
        employee_id: String,
        reason: String,
    },
    RemovalSucceeded {
        shift_id: String,
        employee_id: String,
    },
    RemovalFailed {
        shift_id: String,
        employee_id: String,
        reason: String,
    },
    LeaveDecided {
        request_id: String,
        status: LeaveStatus,
    },
}

impl Notification {
    /// The serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::AssignmentSucceeded { .. } => "assignmentSucceeded",
            Notification::AssignmentFailed { .. } => "assignmentFailed",
            Notification::RemovalSucceeded { .. } => "removalSucceeded",
            Notification::RemovalFailed { .. } => "removalFailed",
            Notification::LeaveDecided { .. } => "leaveDecided",
        }
    }

    /// Short user-facing text.
    pub fn message(&self) -> String {
        match self {
            Notification::AssignmentSucceeded {
                employee_name,
                department,
                ..
            } => format!("{} assigned to {} shift", employee_name, department),
            Notification::AssignmentFailed { reason, .. } => {
                format!("Failed to assign employee: {}", reason)
            }
            Notification::RemovalSucceeded { employee_id, .. } => {
                format!("Employee {} removed from shift", employee_id)
            }
            Notification::RemovalFailed { reason, .. } => {
                format!("Failed to remove employee: {}", reason)
            }
            Notification::LeaveDecided { request_id, status } => {
                format!("Leave request {} {}", request_id, status.as_str())
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notification::AssignmentFailed { .. } | Notification::RemovalFailed { .. }
        )
    }
}

#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
    history: Arc<Mutex<VecDeque<Notification>>>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(HISTORY_LEN))),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn emit(&self, notification: Notification) {
        if notification.is_failure() {
            tracing::warn!("{}", notification.message());
        } else {
            tracing::info!("{}", notification.message());
        }

        {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            if history.len() == HISTORY_LEN {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }

        // No receivers is fine
        let _ = self.sender.send(notification);
    }

    /// Most recent notifications, newest last.
    pub fn recent(&self) -> Vec<Notification> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.iter().cloned().collect()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
