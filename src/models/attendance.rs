//! Attendance row model and marking request types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One student's attendance row for one schedule.
///
/// The date and time window are denormalized copies of the owning schedule
/// and are re-stamped whenever the schedule is updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub id: String,
    pub schedule_id: String,
    pub email: String,
    pub date: NaiveDate,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub present: bool,
}

/// Request body for marking a single student present in a schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub schedule_id: String,
    pub email: String,
}

/// Request body for marking several students present in a schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMarkRequest {
    pub schedule_id: String,
    pub emails: Vec<String>,
}

/// Request body for the time-keyed marking path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkByTimeRequest {
    pub email: String,
    /// Format: yyyy-MM-dd
    pub date: String,
    /// Format: HH:mm
    pub from_time: String,
}

/// Outcome of one student's marking attempt within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkStatus {
    Marked,
    NotFound,
    AlreadyMarked,
}

/// Per-student result of a batch marking request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkResult {
    pub email: String,
    pub status: MarkStatus,
}

/// Summary returned by a batch marking request.
///
/// `marked_count` counts only students newly transitioned to present;
/// `results` tags every requested email so callers can tell a missing
/// record apart from a double mark.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMarkSummary {
    pub marked_count: usize,
    pub results: Vec<MarkResult>,
}
