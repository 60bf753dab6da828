//! Coverage and staffing aggregates for the dashboard.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Department, Employee, Shift};

/// Assigned versus required staff on one shift.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Empty,
    Understaffed,
    Full,
    Overstaffed,
}

pub fn coverage_status(assigned: usize, required: u32) -> CoverageStatus {
    let required = required as usize;
    if assigned == 0 {
        CoverageStatus::Empty
    } else if assigned < required {
        CoverageStatus::Understaffed
    } else if assigned == required {
        CoverageStatus::Full
    } else {
        CoverageStatus::Overstaffed
    }
}

pub fn shift_coverage(shift: &Shift) -> CoverageStatus {
    coverage_status(shift.assigned_staff.len(), shift.required_staff)
}

/// `round(current / required * 100)`, rounding halves up. `None` when nothing is required.
pub fn staffing_percentage(current: u64, required: u64) -> Option<u32> {
    if required == 0 {
        return None;
    }
    let rounded = (200 * current + required) / (2 * required);
    Some(u32::try_from(rounded).unwrap_or(u32::MAX))
}

/// Department head count against its minimum.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffingLevel {
    Understaffed,
    Adequate,
    Overstaffed,
}

pub fn staffing_level(current: u32, required: u32) -> StaffingLevel {
    match current.cmp(&required) {
        std::cmp::Ordering::Less => StaffingLevel::Understaffed,
        std::cmp::Ordering::Equal => StaffingLevel::Adequate,
        std::cmp::Ordering::Greater => StaffingLevel::Overstaffed,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStaffing {
    #[serde(flatten)]
    pub department: Department,
    pub staffing_percentage: Option<u32>,
    pub staffing_level: StaffingLevel,
    /// Employees whose home department is this one
    pub derived_staffing: u32,
}

pub fn department_staffing(
    departments: &[Department],
    employees: &[Employee],
) -> Vec<DepartmentStaffing> {
    departments
        .iter()
        .map(|department| {
            let current = department.current_staffing;
            let required = department.minimum_staffing.total;
            let derived = employees
                .iter()
                .filter(|e| e.department == department.name)
                .count();

            DepartmentStaffing {
                department: department.clone(),
                staffing_percentage: staffing_percentage(current.into(), required.into()),
                staffing_level: staffing_level(current, required),
                derived_staffing: u32::try_from(derived).unwrap_or(u32::MAX),
            }
        })
        .collect()
}

/// Headline figures for one day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub active_staff: usize,
    pub shifts_on_date: usize,
    pub open_shifts: usize,
    pub coverage_rate: Option<u32>,
}

pub fn dashboard_summary(
    date: NaiveDate,
    shifts: &[Shift],
    employees: &[Employee],
) -> DashboardSummary {
    let on_date: Vec<&Shift> = shifts.iter().filter(|s| s.date == date).collect();

    let open_shifts = on_date
        .iter()
        .filter(|s| {
            !matches!(
                shift_coverage(s),
                CoverageStatus::Full | CoverageStatus::Overstaffed
            )
        })
        .count();
    let assigned: u64 = on_date.iter().map(|s| s.assigned_staff.len() as u64).sum();
    let required: u64 = on_date.iter().map(|s| u64::from(s.required_staff)).sum();

    DashboardSummary {
        date,
        active_staff: employees.len(),
        shifts_on_date: on_date.len(),
        open_shifts,
        coverage_rate: staffing_percentage(assigned, required),
    }
}
