//! Database repository for schedules, students, and attendance rows.
//!
//! Uses prepared statements and transactions for data integrity. Every
//! multi-row write sequence (create schedule + roster, update schedule +
//! re-stamp, cascade delete) runs inside one transaction so readers never
//! observe a schedule with a partially materialized roster.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{
    BatchMarkSummary, CreateStudentRequest, MarkResult, MarkStatus, NewSchedule, Schedule,
    ScheduleUpdate, StudentAttendance, StudentDetails,
};
use crate::scheduling;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== SCHEDULE OPERATIONS ====================

    /// List all schedules.
    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, AppError> {
        let rows = sqlx::query(
            "SELECT id, location, room_no, date, from_time, to_time, student_branch, year, mark FROM schedules ORDER BY date, from_time"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(schedule_from_row).collect())
    }

    /// Get a schedule by ID.
    pub async fn get_schedule(&self, id: &str) -> Result<Option<Schedule>, AppError> {
        let row = sqlx::query(
            "SELECT id, location, room_no, date, from_time, to_time, student_branch, year, mark FROM schedules WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(schedule_from_row))
    }

    /// List schedules at a location.
    pub async fn schedules_by_location(&self, location: &str) -> Result<Vec<Schedule>, AppError> {
        let rows = sqlx::query(
            "SELECT id, location, room_no, date, from_time, to_time, student_branch, year, mark FROM schedules WHERE location = ? ORDER BY date, from_time"
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(schedule_from_row).collect())
    }

    /// List schedules whose branch list contains the given fragment.
    pub async fn schedules_by_branch(&self, branch: &str) -> Result<Vec<Schedule>, AppError> {
        let pattern = format!("%{}%", branch);
        let rows = sqlx::query(
            "SELECT id, location, room_no, date, from_time, to_time, student_branch, year, mark FROM schedules WHERE student_branch LIKE ? ORDER BY date, from_time"
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(schedule_from_row).collect())
    }

    /// List all schedules sharing a location and date, optionally excluding
    /// one schedule (used during update so it does not conflict with itself).
    pub async fn schedules_for_slot(
        &self,
        location: &str,
        date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Schedule>, AppError> {
        let rows = sqlx::query(
            "SELECT id, location, room_no, date, from_time, to_time, student_branch, year, mark FROM schedules WHERE location = ? AND date = ? AND id != ? ORDER BY from_time"
        )
        .bind(location)
        .bind(date)
        .bind(exclude_id.unwrap_or(""))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(schedule_from_row).collect())
    }

    /// List schedules overlapping a [from, to) window at a location and date.
    pub async fn find_overlapping_schedules(
        &self,
        location: &str,
        date: NaiveDate,
        from_time: NaiveTime,
        to_time: NaiveTime,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Schedule>, AppError> {
        let existing = self.schedules_for_slot(location, date, exclude_id).await?;

        Ok(existing
            .into_iter()
            .filter(|s| scheduling::overlaps(s, from_time, to_time))
            .collect())
    }

    /// Whether a [from, to) slot is free at a location and date.
    ///
    /// Read-only check; nothing serializes it against a concurrent insert,
    /// so two conflicting creations can both pass. Callers go through this
    /// one seam so a serialization point can be added without changing them.
    pub async fn is_time_slot_available(
        &self,
        location: &str,
        date: NaiveDate,
        from_time: NaiveTime,
        to_time: NaiveTime,
        exclude_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let existing = self.schedules_for_slot(location, date, exclude_id).await?;
        Ok(scheduling::slot_is_free(&existing, from_time, to_time))
    }

    /// Create a schedule and materialize its attendance roster atomically.
    ///
    /// One attendance row is inserted per student whose branch is in the
    /// schedule's branch list and whose year matches the schedule's year.
    pub async fn create_schedule(&self, new: &NewSchedule) -> Result<Schedule, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO schedules (id, location, room_no, date, from_time, to_time, student_branch, year, mark) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)"
        )
        .bind(&id)
        .bind(&new.location)
        .bind(&new.room_no)
        .bind(new.date)
        .bind(new.from_time)
        .bind(new.to_time)
        .bind(&new.student_branch)
        .bind(&new.year)
        .execute(&mut *tx)
        .await?;

        let students = match &new.year {
            Some(year) => {
                let branches = scheduling::split_branches(&new.student_branch);
                students_in_cohort(&mut tx, &branches, year).await?
            }
            // Unrecognized year code: the schedule exists but matches nobody.
            None => Vec::new(),
        };

        if students.is_empty() {
            tracing::warn!(
                "No students matched branches '{}' year {:?} for schedule {}",
                new.student_branch,
                new.year,
                id
            );
        }

        for student in &students {
            sqlx::query(
                "INSERT INTO student_attendance (id, schedule_id, email, date, from_time, to_time, present) VALUES (?, ?, ?, ?, ?, ?, 0)"
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&student.email)
            .bind(new.date)
            .bind(new.from_time)
            .bind(new.to_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Created schedule {} with {} roster rows", id, students.len());

        Ok(Schedule {
            id,
            location: new.location.clone(),
            room_no: new.room_no.clone(),
            date: new.date,
            from_time: new.from_time,
            to_time: new.to_time,
            student_branch: new.student_branch.clone(),
            year: new.year.clone(),
            mark: false,
        })
    }

    /// Overwrite a schedule's fields and re-stamp its roster atomically.
    ///
    /// Every owned attendance row gets the new date and time window; present
    /// and email are untouched. Roster membership is NOT recomputed even if
    /// the branch list changed, and the year is never overwritten (both
    /// preserved source behaviors).
    pub async fn update_schedule(
        &self,
        id: &str,
        update: &ScheduleUpdate,
    ) -> Result<Option<Schedule>, AppError> {
        let Some(existing) = self.get_schedule(id).await? else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE schedules SET location = ?, room_no = ?, date = ?, from_time = ?, to_time = ?, student_branch = ? WHERE id = ?"
        )
        .bind(&update.location)
        .bind(&update.room_no)
        .bind(update.date)
        .bind(update.from_time)
        .bind(update.to_time)
        .bind(&update.student_branch)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let restamped = sqlx::query(
            "UPDATE student_attendance SET date = ?, from_time = ?, to_time = ? WHERE schedule_id = ?",
        )
        .bind(update.date)
        .bind(update.from_time)
        .bind(update.to_time)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Updated schedule {} and re-stamped {} roster rows",
            id,
            restamped.rows_affected()
        );

        Ok(Some(Schedule {
            id: id.to_string(),
            location: update.location.clone(),
            room_no: update.room_no.clone(),
            date: update.date,
            from_time: update.from_time,
            to_time: update.to_time,
            student_branch: update.student_branch.clone(),
            year: existing.year,
            mark: existing.mark,
        }))
    }

    /// Delete a schedule and its attendance rows atomically.
    ///
    /// Returns `false` without error when the id does not exist.
    pub async fn delete_schedule(&self, id: &str) -> Result<bool, AppError> {
        let exists = sqlx::query("SELECT id FROM schedules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if !exists {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query("DELETE FROM student_attendance WHERE schedule_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Deleted schedule {} and {} attendance rows",
            id,
            rows.rows_affected()
        );

        Ok(true)
    }

    /// Flip only the mark flag on a schedule.
    ///
    /// Returns `None` when the schedule does not exist.
    pub async fn update_mark_status(
        &self,
        id: &str,
        mark: bool,
    ) -> Result<Option<Schedule>, AppError> {
        let Some(mut existing) = self.get_schedule(id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE schedules SET mark = ? WHERE id = ?")
            .bind(mark as i32)
            .bind(id)
            .execute(&self.pool)
            .await?;

        existing.mark = mark;
        Ok(Some(existing))
    }

    // ==================== ATTENDANCE OPERATIONS ====================

    /// List the attendance roster for a schedule.
    pub async fn attendance_for_schedule(
        &self,
        schedule_id: &str,
    ) -> Result<Vec<StudentAttendance>, AppError> {
        let rows = sqlx::query(
            "SELECT id, schedule_id, email, date, from_time, to_time, present FROM student_attendance WHERE schedule_id = ? ORDER BY email"
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    /// List the students marked present for a schedule.
    pub async fn present_for_schedule(
        &self,
        schedule_id: &str,
    ) -> Result<Vec<StudentAttendance>, AppError> {
        let rows = sqlx::query(
            "SELECT id, schedule_id, email, date, from_time, to_time, present FROM student_attendance WHERE schedule_id = ? AND present = 1 ORDER BY email"
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    /// List the students still unmarked for a schedule.
    pub async fn absent_for_schedule(
        &self,
        schedule_id: &str,
    ) -> Result<Vec<StudentAttendance>, AppError> {
        let rows = sqlx::query(
            "SELECT id, schedule_id, email, date, from_time, to_time, present FROM student_attendance WHERE schedule_id = ? AND present = 0 ORDER BY email"
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    /// Mark one student present in a schedule.
    ///
    /// Fails with NotFound when no roster row exists and with AlreadyMarked
    /// when the row is already present; the existing state is never changed
    /// by a rejected attempt.
    pub async fn mark_attendance_by_schedule(
        &self,
        schedule_id: &str,
        email: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        mark_row_in_tx(&mut tx, schedule_id, email).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Mark several students present in a schedule, one transaction for the
    /// whole batch.
    ///
    /// Per-student NotFound and AlreadyMarked failures are recorded and
    /// skipped; any other failure aborts the batch. The summary tags every
    /// requested email so callers can tell the failure modes apart.
    pub async fn mark_attendance_batch(
        &self,
        schedule_id: &str,
        emails: &[String],
    ) -> Result<BatchMarkSummary, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(emails.len());
        let mut marked_count = 0;

        for email in emails {
            let status = match mark_row_in_tx(&mut tx, schedule_id, email).await {
                Ok(()) => {
                    marked_count += 1;
                    MarkStatus::Marked
                }
                Err(AppError::NotFound(msg)) => {
                    tracing::warn!("Error marking attendance for {}: {}", email, msg);
                    MarkStatus::NotFound
                }
                Err(AppError::AlreadyMarked(msg)) => {
                    tracing::warn!("Error marking attendance for {}: {}", email, msg);
                    MarkStatus::AlreadyMarked
                }
                Err(other) => return Err(other),
            };

            results.push(MarkResult {
                email: email.clone(),
                status,
            });
        }

        tx.commit().await?;

        Ok(BatchMarkSummary {
            marked_count,
            results,
        })
    }

    /// Mark a student present by email, date, and start time (legacy path).
    pub async fn mark_attendance_by_time(
        &self,
        email: &str,
        date: NaiveDate,
        from_time: NaiveTime,
    ) -> Result<(), AppError> {
        let row = sqlx::query(
            "SELECT id, present FROM student_attendance WHERE email = ? AND date = ? AND from_time = ?",
        )
        .bind(email)
        .bind(date)
        .bind(from_time)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(AppError::NotFound(format!(
                "No attendance record found for {} on {} at {}",
                email, date, from_time
            )));
        };

        let present: i32 = row.get("present");
        if present != 0 {
            return Err(AppError::AlreadyMarked(format!(
                "Attendance already marked for {} on {} at {}",
                email, date, from_time
            )));
        }

        let id: String = row.get("id");
        sqlx::query("UPDATE student_attendance SET present = 1 WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List the distinct dates having attendance rows.
    pub async fn distinct_attendance_dates(&self) -> Result<Vec<NaiveDate>, AppError> {
        let rows = sqlx::query("SELECT DISTINCT date FROM student_attendance ORDER BY date")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("date")).collect())
    }

    // ==================== STUDENT OPERATIONS ====================

    /// Register a student.
    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<StudentDetails, AppError> {
        if self.student_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Student {} is already registered",
                request.email
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO student_details (id, email, name, branch, year) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.name)
        .bind(&request.branch)
        .bind(&request.year)
        .execute(&self.pool)
        .await?;

        Ok(StudentDetails {
            id,
            email: request.email.clone(),
            name: request.name.clone(),
            branch: request.branch.clone(),
            year: request.year.clone(),
        })
    }

    /// List all registered students.
    pub async fn list_students(&self) -> Result<Vec<StudentDetails>, AppError> {
        let rows =
            sqlx::query("SELECT id, email, name, branch, year FROM student_details ORDER BY email")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    /// Look up a student by email, case-insensitively.
    pub async fn student_by_email(&self, email: &str) -> Result<Option<StudentDetails>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, branch, year FROM student_details WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }
}

/// Apply the Unmarked -> Present transition inside a transaction.
async fn mark_row_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    schedule_id: &str,
    email: &str,
) -> Result<(), AppError> {
    let row =
        sqlx::query("SELECT id, present FROM student_attendance WHERE schedule_id = ? AND email = ?")
            .bind(schedule_id)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?;

    let Some(row) = row else {
        return Err(AppError::NotFound(format!(
            "No attendance record found for {} in schedule {}",
            email, schedule_id
        )));
    };

    let present: i32 = row.get("present");
    if present != 0 {
        return Err(AppError::AlreadyMarked(format!(
            "Attendance already marked for {} in this schedule",
            email
        )));
    }

    let id: String = row.get("id");
    sqlx::query("UPDATE student_attendance SET present = 1 WHERE id = ?")
        .bind(&id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Fetch the students whose branch is in the given set and whose year
/// matches, inside the enclosing transaction.
async fn students_in_cohort(
    tx: &mut Transaction<'_, Sqlite>,
    branches: &[String],
    year: &str,
) -> Result<Vec<StudentDetails>, AppError> {
    if branches.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; branches.len()].join(", ");
    let sql = format!(
        "SELECT id, email, name, branch, year FROM student_details WHERE branch IN ({}) AND year = ? ORDER BY email",
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for branch in branches {
        query = query.bind(branch);
    }
    query = query.bind(year);

    let rows = query.fetch_all(&mut **tx).await?;

    Ok(rows.iter().map(student_from_row).collect())
}

// Helper functions for row conversion

fn schedule_from_row(row: &sqlx::sqlite::SqliteRow) -> Schedule {
    let mark: i32 = row.get("mark");
    Schedule {
        id: row.get("id"),
        location: row.get("location"),
        room_no: row.get("room_no"),
        date: row.get("date"),
        from_time: row.get("from_time"),
        to_time: row.get("to_time"),
        student_branch: row.get("student_branch"),
        year: row.get("year"),
        mark: mark != 0,
    }
}

fn attendance_from_row(row: &sqlx::sqlite::SqliteRow) -> StudentAttendance {
    let present: i32 = row.get("present");
    StudentAttendance {
        id: row.get("id"),
        schedule_id: row.get("schedule_id"),
        email: row.get("email"),
        date: row.get("date"),
        from_time: row.get("from_time"),
        to_time: row.get("to_time"),
        present: present != 0,
    }
}

fn student_from_row(row: &sqlx::sqlite::SqliteRow) -> StudentDetails {
    StudentDetails {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        branch: row.get("branch"),
        year: row.get("year"),
    }
}
