//! Scheduling rules and workflows built on top of the record stores.

mod assignment;
mod departments;
mod eligibility;
mod leave;
mod roster;
mod staffing;

pub use assignment::*;
pub use departments::*;
pub use leave::*;
pub use roster::*;
pub use staffing::*;
