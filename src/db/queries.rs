//! Read-only query helpers over a store's full collection.

use chrono::NaiveDate;

use super::RecordStore;
use crate::errors::AppError;
use crate::models::{Employee, LeaveRequest, LeaveStatus, Shift};

pub async fn employees_by_department(
    store: &dyn RecordStore<Employee>,
    department: &str,
) -> Result<Vec<Employee>, AppError> {
    let employees = store.get_all().await?;
    Ok(employees
        .into_iter()
        .filter(|e| e.department == department)
        .collect())
}

/// Employees who listed `slot` as available on `date`.
pub async fn available_employees(
    store: &dyn RecordStore<Employee>,
    date: NaiveDate,
    slot: &str,
) -> Result<Vec<Employee>, AppError> {
    let employees = store.get_all().await?;
    Ok(employees
        .into_iter()
        .filter(|e| e.is_available(date, slot))
        .collect())
}

pub async fn shifts_by_date(
    store: &dyn RecordStore<Shift>,
    date: NaiveDate,
) -> Result<Vec<Shift>, AppError> {
    let shifts = store.get_all().await?;
    Ok(shifts.into_iter().filter(|s| s.date == date).collect())
}

pub async fn shifts_by_department(
    store: &dyn RecordStore<Shift>,
    department: &str,
) -> Result<Vec<Shift>, AppError> {
    let shifts = store.get_all().await?;
    Ok(shifts
        .into_iter()
        .filter(|s| s.department == department)
        .collect())
}

pub async fn leave_requests_by_employee(
    store: &dyn RecordStore<LeaveRequest>,
    employee_id: &str,
) -> Result<Vec<LeaveRequest>, AppError> {
    let requests = store.get_all().await?;
    Ok(requests
        .into_iter()
        .filter(|r| r.employee_id == employee_id)
        .collect())
}

pub async fn pending_leave_requests(
    store: &dyn RecordStore<LeaveRequest>,
) -> Result<Vec<LeaveRequest>, AppError> {
    let requests = store.get_all().await?;
    Ok(requests
        .into_iter()
        .filter(|r| r.status == LeaveStatus::Pending)
        .collect())
}
