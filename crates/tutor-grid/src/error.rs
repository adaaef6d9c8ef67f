//! Error types for tutor-grid operations.

use thiserror::Error;

use crate::model::LessonId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid zoom level: {0}")]
    InvalidZoomLevel(u8),

    #[error("Invalid working hours: {start}..{end}")]
    InvalidWorkingHours { start: u32, end: u32 },

    /// The lesson's effective end is not after its start.
    #[error("Invalid duration for lesson {lesson_id}")]
    InvalidLessonDuration { lesson_id: LessonId },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid slot: {hour:02}:{minute:02}")]
    InvalidSlot { hour: u32, minute: u32 },

    #[error("Invalid lesson data: {0}")]
    InvalidLessonData(String),

    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
