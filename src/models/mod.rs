//! Data models for the attendance scheduling application.
//!
//! Request DTOs carry dates and times as strings the way clients submit them;
//! the persisted models use typed `chrono` values.

mod attendance;
mod schedule;
mod student;

pub use attendance::*;
pub use schedule::*;
pub use student::*;
