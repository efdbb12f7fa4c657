//! Student details model and request types.

use serde::{Deserialize, Serialize};

/// A registered student, used as the lookup source for roster enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub id: String,
    pub email: String,
    pub name: String,
    pub branch: String,
    /// Ordinal year label ("first".."fourth").
    pub year: String,
}

/// Request body for registering a student.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub email: String,
    pub name: String,
    pub branch: String,
    pub year: String,
}

/// Request body for looking up a student by email.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLookupRequest {
    pub email: String,
}
