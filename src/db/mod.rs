//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id TEXT PRIMARY KEY,
            location TEXT NOT NULL,
            room_no TEXT NOT NULL,
            date TEXT NOT NULL,
            from_time TEXT NOT NULL,
            to_time TEXT NOT NULL,
            student_branch TEXT NOT NULL,
            year TEXT,
            mark INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student_details (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            branch TEXT NOT NULL,
            year TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // No foreign key on schedule_id: rows are owned by their schedule but
    // coupled loosely, with the cascade handled in the repository.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student_attendance (
            id TEXT PRIMARY KEY,
            schedule_id TEXT NOT NULL,
            email TEXT NOT NULL,
            date TEXT NOT NULL,
            from_time TEXT NOT NULL,
            to_time TEXT NOT NULL,
            present INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_schedules_location_date ON schedules(location, date);
        CREATE INDEX IF NOT EXISTS idx_attendance_schedule ON student_attendance(schedule_id);
        CREATE INDEX IF NOT EXISTS idx_attendance_schedule_email ON student_attendance(schedule_id, email);
        CREATE INDEX IF NOT EXISTS idx_attendance_email ON student_attendance(email);
        CREATE INDEX IF NOT EXISTS idx_students_branch_year ON student_details(branch, year);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
