//! Core scheduling logic.
//!
//! Pure functions for time-slot conflict detection and cohort matching,
//! plus the year-code normalization table. Everything here is synchronous
//! and side-effect free; the repository layer supplies the data.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::errors::AppError;
use crate::models::Schedule;

/// Immutable year-code lookup table, injected at construction.
///
/// Maps roman-numeral year codes to the ordinal labels stored on student
/// records. A code outside the table resolves to `None`; the schedule is
/// still accepted and simply matches no students.
#[derive(Debug, Clone)]
pub struct YearMap {
    entries: HashMap<String, String>,
}

impl YearMap {
    /// The standard four-year mapping.
    pub fn standard() -> Self {
        let entries = [
            ("I", "first"),
            ("II", "second"),
            ("III", "third"),
            ("IV", "fourth"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { entries }
    }

    /// Resolve a year code to its ordinal label.
    pub fn normalize(&self, code: &str) -> Option<String> {
        self.entries.get(code).cloned()
    }
}

impl Default for YearMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Whether a half-open interval [from, to) overlaps a schedule's window.
///
/// Two intervals [a,b) and [c,d) do not overlap iff `b <= c || a >= d`, so a
/// slot ending exactly when another begins does not conflict.
pub fn overlaps(schedule: &Schedule, from: NaiveTime, to: NaiveTime) -> bool {
    !(to <= schedule.from_time || from >= schedule.to_time)
}

/// Whether a half-open interval [from, to) is free of conflicts against the
/// given schedules. Callers are expected to have filtered `existing` down to
/// one location and date.
pub fn slot_is_free(existing: &[Schedule], from: NaiveTime, to: NaiveTime) -> bool {
    existing.iter().all(|s| !overlaps(s, from, to))
}

/// Split a comma-separated branch list into trimmed, non-empty codes.
pub fn split_branches(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `yyyy-MM-dd` date string.
pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidFormat(format!("Invalid date: {}", s)))
}

/// Parse an `HH:mm` time string. Single-digit hours are accepted.
pub fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| AppError::InvalidFormat(format!("Invalid time: {}", s)))
}
