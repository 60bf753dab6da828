//! Employee model.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Record;

/// A staff member who can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Home department name
    pub department: String,
    /// Departments the employee is cross-trained for
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Time-slot labels the employee can work, keyed by date
    #[serde(default)]
    pub availability: BTreeMap<NaiveDate, BTreeSet<String>>,
}

impl Employee {
    /// Whether the employee may work in `department`, either as home or cross-trained.
    pub fn works_in(&self, department: &str) -> bool {
        self.department == department || self.certifications.contains(department)
    }

    pub fn is_available(&self, date: NaiveDate, slot: &str) -> bool {
        self.availability
            .get(&date)
            .is_some_and(|slots| slots.contains(slot))
    }
}

/// Request body for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub department: String,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    #[serde(default)]
    pub availability: BTreeMap<NaiveDate, BTreeSet<String>>,
}

/// Request body for updating an existing employee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub certifications: Option<BTreeSet<String>>,
    #[serde(default)]
    pub availability: Option<BTreeMap<NaiveDate, BTreeSet<String>>>,
}

impl Record for Employee {
    type Draft = CreateEmployeeRequest;
    type Patch = UpdateEmployeeRequest;

    const TABLE: &'static str = "employee";
    const KIND: &'static str = "Employee";
    const FIELDS: &'static [&'static str] = &["name", "role", "department"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: Self::Draft, _today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            role: draft.role,
            department: draft.department,
            certifications: draft.certifications,
            availability: draft.availability,
        }
    }

    fn apply(&mut self, patch: Self::Patch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(certifications) = patch.certifications {
            self.certifications = certifications;
        }
        if let Some(availability) = patch.availability {
            self.availability = availability;
        }
    }
}
