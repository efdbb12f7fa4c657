//! Schedule API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AvailabilityQuery, AvailabilityResponse, CreateScheduleRequest, MarkStatusRequest, NewSchedule,
    Schedule, ScheduleUpdate, UpdateScheduleRequest,
};
use crate::scheduling;
use crate::AppState;

/// GET /api/schedules - List all schedules.
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Vec<Schedule>> {
    let schedules = state.repo.list_schedules().await?;
    success(schedules)
}

/// GET /api/schedules/:id - Get a single schedule.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Schedule> {
    match state.repo.get_schedule(&id).await? {
        Some(schedule) => success(schedule),
        None => Err(AppError::NotFound(format!("Schedule {} not found", id))),
    }
}

/// POST /api/schedules - Create a schedule and enroll matching students.
///
/// Availability is the caller's responsibility (via the availability
/// endpoint); a conflicting slot is not rejected here.
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> ApiResult<Schedule> {
    // Validate required fields
    if request.location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".to_string()));
    }
    if request.student_branch.trim().is_empty() {
        return Err(AppError::Validation(
            "Student branch is required".to_string(),
        ));
    }

    let date = scheduling::parse_date(&request.date)?;
    let from_time = scheduling::parse_time(&request.from_time)?;
    let to_time = scheduling::parse_time(&request.to_time)?;

    // Unrecognized year codes pass through as None and match no students.
    let year = state.year_map.normalize(&request.year);

    let new = NewSchedule {
        location: request.location,
        room_no: request.room_no,
        date,
        from_time,
        to_time,
        student_branch: request.student_branch,
        year,
    };

    let schedule = state.repo.create_schedule(&new).await?;
    success(schedule)
}

/// PUT /api/schedules/:id - Update a schedule and re-stamp its roster.
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateScheduleRequest>,
) -> ApiResult<Schedule> {
    let date = scheduling::parse_date(&request.date)?;
    let from_time = scheduling::parse_time(&request.from_time)?;
    let to_time = scheduling::parse_time(&request.to_time)?;

    let update = ScheduleUpdate {
        location: request.location,
        room_no: request.room_no,
        date,
        from_time,
        to_time,
        student_branch: request.student_branch,
    };

    match state.repo.update_schedule(&id, &update).await? {
        Some(schedule) => success(schedule),
        None => Err(AppError::NotFound(format!("Schedule {} not found", id))),
    }
}

/// DELETE /api/schedules/:id - Delete a schedule and its attendance rows.
pub async fn delete_schedule(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    if state.repo.delete_schedule(&id).await? {
        success(())
    } else {
        Err(AppError::NotFound(format!("Schedule {} not found", id)))
    }
}

/// PUT /api/schedules/:id/mark - Update only the mark flag.
pub async fn update_mark_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MarkStatusRequest>,
) -> ApiResult<Schedule> {
    match state.repo.update_mark_status(&id, request.mark).await? {
        Some(schedule) => success(schedule),
        None => Err(AppError::NotFound(format!("Schedule {} not found", id))),
    }
}

/// GET /api/schedules/availability - Check whether a time slot is free.
pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<AvailabilityResponse> {
    let date = scheduling::parse_date(&query.date)?;
    let from_time = scheduling::parse_time(&query.from_time)?;
    let to_time = scheduling::parse_time(&query.to_time)?;

    let available = state
        .repo
        .is_time_slot_available(
            &query.location,
            date,
            from_time,
            to_time,
            query.exclude_id.as_deref(),
        )
        .await?;

    success(AvailabilityResponse { available })
}

/// GET /api/schedules/overlapping - List schedules overlapping a time window.
pub async fn overlapping_schedules(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<Schedule>> {
    let date = scheduling::parse_date(&query.date)?;
    let from_time = scheduling::parse_time(&query.from_time)?;
    let to_time = scheduling::parse_time(&query.to_time)?;

    let overlapping = state
        .repo
        .find_overlapping_schedules(
            &query.location,
            date,
            from_time,
            to_time,
            query.exclude_id.as_deref(),
        )
        .await?;

    success(overlapping)
}

/// GET /api/schedules/location/:location - List schedules at a location.
pub async fn schedules_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> ApiResult<Vec<Schedule>> {
    let schedules = state.repo.schedules_by_location(&location).await?;
    success(schedules)
}

/// GET /api/schedules/branch/:branch - List schedules targeting a branch.
pub async fn schedules_by_branch(
    State(state): State<AppState>,
    Path(branch): Path<String>,
) -> ApiResult<Vec<Schedule>> {
    let schedules = state.repo.schedules_by_branch(&branch).await?;
    success(schedules)
}
