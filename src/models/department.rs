//! Department model.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Record;

/// Minimum head count a department must be staffed with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinimumStaffing {
    pub total: u32,
    /// Minimum head count per role
    #[serde(default)]
    pub by_role: BTreeMap<String, u32>,
}

/// A hospital department with its staffing target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub minimum_staffing: MinimumStaffing,
    /// Cached staffed head count
    #[serde(default)]
    pub current_staffing: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for creating a new department.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub minimum_staffing: MinimumStaffing,
    #[serde(default)]
    pub current_staffing: u32,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for updating an existing department.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub minimum_staffing: Option<MinimumStaffing>,
    #[serde(default)]
    pub current_staffing: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Record for Department {
    type Draft = CreateDepartmentRequest;
    type Patch = UpdateDepartmentRequest;

    const TABLE: &'static str = "department";
    const KIND: &'static str = "Department";
    const FIELDS: &'static [&'static str] = &["name", "status"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: Self::Draft, _today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            minimum_staffing: draft.minimum_staffing,
            current_staffing: draft.current_staffing,
            status: draft.status,
        }
    }

    fn apply(&mut self, patch: Self::Patch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(minimum_staffing) = patch.minimum_staffing {
            self.minimum_staffing = minimum_staffing;
        }
        if let Some(current_staffing) = patch.current_staffing {
            self.current_staffing = current_staffing;
        }
        self.status = patch.status.or(self.status.take());
    }
}
