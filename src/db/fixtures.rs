//! Bundled mock data for the in-memory stores.

use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{Department, Employee, LeaveRequest, Shift};

const EMPLOYEES: &str = include_str!("fixtures/employees.json");
const DEPARTMENTS: &str = include_str!("fixtures/departments.json");
const SHIFTS: &str = include_str!("fixtures/shifts.json");
const LEAVE_REQUESTS: &str = include_str!("fixtures/leave_requests.json");

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Invalid {} fixture: {}", name, e)))
}

pub fn employees() -> Result<Vec<Employee>, AppError> {
    parse("employees", EMPLOYEES)
}

pub fn departments() -> Result<Vec<Department>, AppError> {
    parse("departments", DEPARTMENTS)
}

pub fn shifts() -> Result<Vec<Shift>, AppError> {
    parse("shifts", SHIFTS)
}

pub fn leave_requests() -> Result<Vec<LeaveRequest>, AppError> {
    parse("leave requests", LEAVE_REQUESTS)
}
