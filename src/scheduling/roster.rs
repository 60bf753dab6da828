//! Read-time resolution of assigned staff ids against current employee records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::staffing::{shift_coverage, CoverageStatus};
use crate::models::{Employee, Shift};

/// An assigned employee as shown on a shift. Name and role are absent when the employee
/// record no longer exists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftView {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub department: String,
    pub required_staff: u32,
    pub assigned_staff: Vec<StaffMember>,
    pub coverage: CoverageStatus,
}

pub fn resolve_shift(shift: Shift, employees: &[Employee]) -> ShiftView {
    let index: HashMap<&str, &Employee> = employees.iter().map(|e| (e.id.as_str(), e)).collect();
    resolve_with(shift, &index)
}

pub fn resolve_shifts(shifts: Vec<Shift>, employees: &[Employee]) -> Vec<ShiftView> {
    let index: HashMap<&str, &Employee> = employees.iter().map(|e| (e.id.as_str(), e)).collect();
    shifts
        .into_iter()
        .map(|shift| resolve_with(shift, &index))
        .collect()
}

fn resolve_with(shift: Shift, index: &HashMap<&str, &Employee>) -> ShiftView {
    let coverage = shift_coverage(&shift);
    let assigned_staff = shift
        .assigned_staff
        .into_iter()
        .map(|id| match index.get(id.as_str()) {
            Some(employee) => StaffMember {
                name: Some(employee.name.clone()),
                role: Some(employee.role.clone()),
                id,
            },
            None => StaffMember {
                id,
                name: None,
                role: None,
            },
        })
        .collect();

    ShiftView {
        id: shift.id,
        date: shift.date,
        start_time: shift.start_time,
        end_time: shift.end_time,
        department: shift.department,
        required_staff: shift.required_staff,
        assigned_staff,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::{RecordStore, Stores};

    #[tokio::test]
    async fn test_resolves_current_names_and_flags_stale_ids() {
        let stores = Stores::mock(Duration::ZERO).unwrap();
        let employees = stores.employees.get_all().await.unwrap();
        let mut shift = stores.shifts.get_by_id("2").await.unwrap().unwrap();
        shift.assigned_staff.push("gone".to_string());

        let view = resolve_shift(shift, &employees);

        assert_eq!(view.assigned_staff.len(), 3);
        assert_eq!(view.assigned_staff[0].name.as_deref(), Some("Michael Chen"));
        assert_eq!(view.assigned_staff[1].role.as_deref(), Some("Registered Nurse"));
        assert_eq!(view.assigned_staff[2].id, "gone");
        assert!(view.assigned_staff[2].name.is_none());
        assert_eq!(view.coverage, CoverageStatus::Overstaffed);
    }
}
