//! Data models for the Shiftboard scheduling dashboard.
//!
//! Field names serialize in camelCase to match the dashboard's JSON contract.

mod department;
mod employee;
mod leave_request;
mod shift;

pub use department::*;
pub use employee::*;
pub use leave_request::*;
pub use shift::*;
