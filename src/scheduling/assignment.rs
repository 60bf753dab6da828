//! Assigning employees to shifts and removing them again.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::eligibility::{check_assignment, eligible_employees};
use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::{Employee, Shift, UpdateShiftRequest};
use crate::notifications::{Notification, Notifier};

/// Writes assignments through the shift store.
///
/// Assignment and removal run one at a time so concurrent drops on the same shift cannot
/// overwrite each other's staff list. Every attempt emits exactly one notification.
pub struct Scheduler {
    shifts: Arc<dyn RecordStore<Shift>>,
    employees: Arc<dyn RecordStore<Employee>>,
    notifier: Notifier,
    gate: Mutex<()>,
}

impl Scheduler {
    pub fn new(
        shifts: Arc<dyn RecordStore<Shift>>,
        employees: Arc<dyn RecordStore<Employee>>,
        notifier: Notifier,
    ) -> Self {
        Self {
            shifts,
            employees,
            notifier,
            gate: Mutex::new(()),
        }
    }

    async fn load_shift(&self, shift_id: &str) -> Result<Shift, AppError> {
        self.shifts
            .get_by_id(shift_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", shift_id))
    }

    async fn load_employee(&self, employee_id: &str) -> Result<Employee, AppError> {
        self.employees
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", employee_id))
    }

    /// Employees that may be dropped onto the shift.
    pub async fn eligible_for(&self, shift_id: &str) -> Result<Vec<Employee>, AppError> {
        let shift = self.load_shift(shift_id).await?;
        let employees = self.employees.get_all().await?;
        Ok(eligible_employees(&shift, &employees)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Append the employee to the shift's staff and return the persisted shift.
    pub async fn assign(&self, shift_id: &str, employee_id: &str) -> Result<Shift, AppError> {
        let _gate = self.gate.lock().await;

        match self.try_assign(shift_id, employee_id).await {
            Ok((shift, employee)) => {
                self.notifier.emit(Notification::AssignmentSucceeded {
                    shift_id: shift.id.clone(),
                    employee_id: employee.id,
                    employee_name: employee.name,
                    department: shift.department.clone(),
                });
                Ok(shift)
            }
            Err(err) => {
                self.notifier.emit(Notification::AssignmentFailed {
                    shift_id: shift_id.to_string(),
                    employee_id: employee_id.to_string(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn try_assign(
        &self,
        shift_id: &str,
        employee_id: &str,
    ) -> Result<(Shift, Employee), AppError> {
        let shift = self.load_shift(shift_id).await?;
        let employee = self.load_employee(employee_id).await?;
        check_assignment(&shift, &employee)?;

        let mut staff = shift.assigned_staff;
        staff.push(employee.id.clone());
        let persisted = self
            .shifts
            .update(&shift.id, UpdateShiftRequest::assigned(staff))
            .await?;

        tracing::debug!(
            "Shift {} now has {}/{} staff",
            persisted.id,
            persisted.assigned_staff.len(),
            persisted.required_staff
        );
        Ok((persisted, employee))
    }

    /// Take the employee off the shift. Removing someone who is not assigned succeeds
    /// without writing, and is still announced.
    pub async fn remove(&self, shift_id: &str, employee_id: &str) -> Result<Shift, AppError> {
        let _gate = self.gate.lock().await;

        match self.try_remove(shift_id, employee_id).await {
            Ok((shift, removed)) => {
                if !removed {
                    tracing::debug!(
                        "Employee {} not on shift {}, nothing to remove",
                        employee_id,
                        shift_id
                    );
                }
                self.notifier.emit(Notification::RemovalSucceeded {
                    shift_id: shift.id.clone(),
                    employee_id: employee_id.to_string(),
                });
                Ok(shift)
            }
            Err(err) => {
                self.notifier.emit(Notification::RemovalFailed {
                    shift_id: shift_id.to_string(),
                    employee_id: employee_id.to_string(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn try_remove(&self, shift_id: &str, employee_id: &str) -> Result<(Shift, bool), AppError> {
        let shift = self.load_shift(shift_id).await?;
        if !shift.is_assigned(employee_id) {
            return Ok((shift, false));
        }

        let staff: Vec<String> = shift
            .assigned_staff
            .into_iter()
            .filter(|id| id != employee_id)
            .collect();
        let persisted = self
            .shifts
            .update(&shift.id, UpdateShiftRequest::assigned(staff))
            .await?;
        Ok((persisted, true))
    }
}
