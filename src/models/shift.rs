//! Shift model.
//!
//! Assigned staff are stored as employee ids. Older payloads carry embedded employee
//! snapshots or numeric ids; every deserialization path collapses those to string ids.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::Record;

/// A staffed time slot in one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub department: String,
    #[serde(default)]
    pub required_staff: u32,
    #[serde(default, deserialize_with = "deserialize_staff")]
    pub assigned_staff: Vec<String>,
}

impl Shift {
    pub fn is_assigned(&self, employee_id: &str) -> bool {
        self.assigned_staff.iter().any(|id| id == employee_id)
    }
}

/// Request body for creating a new shift.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub department: String,
    #[serde(default)]
    pub required_staff: u32,
    #[serde(default, deserialize_with = "deserialize_staff")]
    pub assigned_staff: Vec<String>,
}

/// Request body for updating an existing shift.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub required_staff: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_staff")]
    pub assigned_staff: Option<Vec<String>>,
}

impl UpdateShiftRequest {
    /// A patch that only replaces the assigned staff.
    pub fn assigned(staff: Vec<String>) -> Self {
        Self {
            assigned_staff: Some(staff),
            ..Default::default()
        }
    }
}

impl Record for Shift {
    type Draft = CreateShiftRequest;
    type Patch = UpdateShiftRequest;

    const TABLE: &'static str = "shift";
    const KIND: &'static str = "Shift";
    const FIELDS: &'static [&'static str] =
        &["date", "startTime", "endTime", "department"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: Self::Draft, _today: NaiveDate) -> Self {
        Self {
            id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            department: draft.department,
            required_staff: draft.required_staff,
            assigned_staff: normalize_staff(draft.assigned_staff),
        }
    }

    fn apply(&mut self, patch: Self::Patch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(required_staff) = patch.required_staff {
            self.required_staff = required_staff;
        }
        if let Some(staff) = patch.assigned_staff {
            self.assigned_staff = normalize_staff(staff);
        }
    }
}

/// Drop duplicate ids, keeping the first occurrence.
pub fn normalize_staff(ids: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !normalized.contains(&id) {
            normalized.push(id);
        }
    }
    normalized
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefId {
    Text(String),
    Number(u64),
}

impl RefId {
    fn into_string(self) -> String {
        match self {
            RefId::Text(id) => id,
            RefId::Number(id) => id.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StaffRef {
    Bare(RefId),
    Embedded { id: RefId },
}

impl StaffRef {
    fn into_id(self) -> String {
        match self {
            StaffRef::Bare(id) | StaffRef::Embedded { id } => id.into_string(),
        }
    }
}

fn collapse(refs: Vec<StaffRef>) -> Vec<String> {
    normalize_staff(refs.into_iter().map(StaffRef::into_id).collect())
}

fn deserialize_staff<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<StaffRef>>::deserialize(deserializer)?;
    Ok(refs.map(collapse).unwrap_or_default())
}

fn deserialize_optional_staff<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<StaffRef>>::deserialize(deserializer)?;
    Ok(refs.map(collapse))
}
