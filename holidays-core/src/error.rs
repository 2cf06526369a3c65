//! Error types for holiday generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading definitions or generating a calendar.
#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("{} is malformed: {reason}", .path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("Invalid year range: {start} to {end}. Must be 1900-2100 and start <= end.")]
    InvalidRange { start: i32, end: i32 },

    #[error("Invalid date: {month:02}-{day:02}{}", .year.map(|y| format!(" in {y}")).unwrap_or_default())]
    InvalidDate {
        year: Option<i32>,
        month: u32,
        day: u32,
    },

    #[error("There is no occurrence #{nth} of {weekday} in {year}-{month:02}")]
    NoSuchOccurrence {
        year: i32,
        month: u32,
        weekday: chrono::Weekday,
        nth: u32,
    },

    #[error("Holiday '{0}' already exists.")]
    HolidayExists(String),

    #[error("Could not read cache at {}: {reason}", .path.display())]
    CacheUnreadable { path: PathBuf, reason: String },

    #[error("Could not write cache at {}: {source}", .path.display())]
    CacheUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save iCal file at {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HolidayError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HolidayError::ConfigMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for holiday operations.
pub type HolidayResult<T> = Result<T, HolidayError>;
