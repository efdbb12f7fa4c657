//! Attendance API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::models::{
    BatchMarkRequest, BatchMarkSummary, MarkAttendanceRequest, MarkByTimeRequest,
    StudentAttendance,
};
use crate::scheduling;
use crate::AppState;

/// GET /api/schedules/:id/attendance - List the roster for a schedule.
pub async fn attendance_for_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<StudentAttendance>> {
    let roster = state.repo.attendance_for_schedule(&id).await?;
    success(roster)
}

/// GET /api/schedules/:id/attendance/present - List present students.
pub async fn present_for_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<StudentAttendance>> {
    let present = state.repo.present_for_schedule(&id).await?;
    success(present)
}

/// GET /api/schedules/:id/attendance/absent - List absent students.
pub async fn absent_for_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<StudentAttendance>> {
    let absent = state.repo.absent_for_schedule(&id).await?;
    success(absent)
}

/// POST /api/attendance/mark - Mark one student present in a schedule.
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(request): Json<MarkAttendanceRequest>,
) -> ApiResult<()> {
    state
        .repo
        .mark_attendance_by_schedule(&request.schedule_id, &request.email)
        .await?;
    success(())
}

/// POST /api/attendance/mark/batch - Mark several students present.
pub async fn mark_attendance_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchMarkRequest>,
) -> ApiResult<BatchMarkSummary> {
    let summary = state
        .repo
        .mark_attendance_batch(&request.schedule_id, &request.emails)
        .await?;
    success(summary)
}

/// POST /api/attendance/mark/by-time - Mark a student present by date and
/// start time (legacy path).
pub async fn mark_attendance_by_time(
    State(state): State<AppState>,
    Json(request): Json<MarkByTimeRequest>,
) -> ApiResult<()> {
    let date = scheduling::parse_date(&request.date)?;
    let from_time = scheduling::parse_time(&request.from_time)?;

    state
        .repo
        .mark_attendance_by_time(&request.email, date, from_time)
        .await?;
    success(())
}

/// GET /api/attendance/dates - List the distinct dates having attendance rows.
pub async fn attendance_dates(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let dates = state.repo.distinct_attendance_dates().await?;
    success(dates.into_iter().map(|d| d.to_string()).collect())
}
