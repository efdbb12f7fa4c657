//! Schedule model and schedule request types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An administrator-defined attendance session targeting a branch/year cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub location: String,
    pub room_no: String,
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    /// Comma-separated branch codes, e.g. "CSE,ECE".
    pub student_branch: String,
    /// Normalized ordinal year label ("first".."fourth"). None when the
    /// submitted year code was not in the lookup table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub mark: bool,
}

/// A parsed, validated schedule ready for insertion.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub location: String,
    pub room_no: String,
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub student_branch: String,
    pub year: Option<String>,
}

/// A parsed, validated field overwrite for an existing schedule.
///
/// The year is deliberately absent: it is fixed at creation time.
#[derive(Debug, Clone)]
pub struct ScheduleUpdate {
    pub location: String,
    pub room_no: String,
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub student_branch: String,
}

/// Request body for creating a new schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub location: String,
    pub room_no: String,
    /// Format: yyyy-MM-dd
    pub date: String,
    /// Format: HH:mm
    pub from_time: String,
    /// Format: HH:mm
    pub to_time: String,
    pub student_branch: String,
    /// Roman-numeral year code ("I".."IV").
    pub year: String,
}

/// Request body for updating an existing schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub location: String,
    pub room_no: String,
    /// Format: yyyy-MM-dd
    pub date: String,
    /// Format: HH:mm
    pub from_time: String,
    /// Format: HH:mm
    pub to_time: String,
    pub student_branch: String,
}

/// Request body for updating only the mark flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStatusRequest {
    pub mark: bool,
}

/// Query parameters for the time-slot availability check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub location: String,
    /// Format: yyyy-MM-dd
    pub date: String,
    /// Format: HH:mm
    pub from_time: String,
    /// Format: HH:mm
    pub to_time: String,
    /// Schedule to exclude from the check, so an update does not conflict
    /// with itself.
    #[serde(default)]
    pub exclude_id: Option<String>,
}

/// Response body for the time-slot availability check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
}
