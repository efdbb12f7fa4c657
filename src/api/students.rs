//! Student API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateStudentRequest, StudentDetails, StudentLookupRequest};
use crate::AppState;

/// POST /api/students - Register a student.
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> ApiResult<StudentDetails> {
    // Validate required fields
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if request.branch.trim().is_empty() {
        return Err(AppError::Validation("Branch is required".to_string()));
    }

    let student = state.repo.create_student(&request).await?;
    success(student)
}

/// GET /api/students - List all registered students.
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Vec<StudentDetails>> {
    let students = state.repo.list_students().await?;
    success(students)
}

/// POST /api/students/details - Look up a student by email.
pub async fn student_details(
    State(state): State<AppState>,
    Json(request): Json<StudentLookupRequest>,
) -> ApiResult<StudentDetails> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    match state.repo.student_by_email(&request.email).await? {
        Some(student) => success(student),
        None => Err(AppError::NotFound("Student not found".to_string())),
    }
}
