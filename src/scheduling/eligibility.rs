//! Which employees may be dropped onto a shift.

use crate::errors::AppError;
use crate::models::{Employee, Shift};

/// Home department or cross-trained for the shift's department, and not already on it.
pub fn is_eligible(shift: &Shift, employee: &Employee) -> bool {
    employee.works_in(&shift.department) && !shift.is_assigned(&employee.id)
}

/// Eligible employees in the order they appear in `employees`.
pub fn eligible_employees<'a>(shift: &Shift, employees: &'a [Employee]) -> Vec<&'a Employee> {
    employees.iter().filter(|e| is_eligible(shift, e)).collect()
}

/// Everything an assignment must satisfy before it is written.
pub fn check_assignment(shift: &Shift, employee: &Employee) -> Result<(), AppError> {
    if shift.is_assigned(&employee.id) {
        return Err(AppError::IneligibleAssignment(format!(
            "{} is already assigned to this shift",
            employee.name
        )));
    }
    if !is_eligible(shift, employee) {
        return Err(AppError::IneligibleAssignment(format!(
            "{} is neither in nor cross-trained for {}",
            employee.name, shift.department
        )));
    }
    if shift.assigned_staff.len() >= shift.required_staff as usize {
        return Err(AppError::IneligibleAssignment(format!(
            "Shift already has {} of {} required staff",
            shift.assigned_staff.len(),
            shift.required_staff
        )));
    }
    Ok(())
}
