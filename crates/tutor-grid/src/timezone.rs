//! Client-local clock strings for lesson cards.
//!
//! Conversion is calendar-aware through `chrono-tz`, so DST is applied for the
//! instant being shown rather than as a fixed offset between two zones.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{GridError, Result};
use crate::model::Lesson;

const CLOCK_FORMAT: &str = "%H:%M";

/// A formatted clock time and whether it came from the fallback zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedTime {
    pub text: String,
    /// `true` when the requested zone was unknown and the fallback was used.
    pub approximate: bool,
}

/// Start and end of a lesson as seen by its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientTimeRange {
    pub start: ProjectedTime,
    pub end: ProjectedTime,
}

/// Parse an IANA timezone identifier.
///
/// # Errors
/// Returns `GridError::UnknownTimezone` if `name` is not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| GridError::UnknownTimezone(name.to_string()))
}

/// Format `instant` as `"HH:MM"` (24-hour) in the named zone.
///
/// # Errors
/// Returns `GridError::UnknownTimezone` for unrecognized zone names.
pub fn project_time(instant: DateTime<Utc>, timezone: &str) -> Result<String> {
    let tz = parse_timezone(timezone)?;
    Ok(format_in(instant, tz))
}

/// Like [`project_time`], but formats in `fallback` when `timezone` is unknown
/// and marks the result as approximate.
pub fn project_time_or(instant: DateTime<Utc>, timezone: &str, fallback: Tz) -> ProjectedTime {
    match parse_timezone(timezone) {
        Ok(tz) => ProjectedTime {
            text: format_in(instant, tz),
            approximate: false,
        },
        Err(e) => {
            log::warn!("{e}; formatting in {fallback} instead");
            ProjectedTime {
                text: format_in(instant, fallback),
                approximate: true,
            }
        }
    }
}

/// The lesson's start and end in its client's timezone.
pub fn client_time_range(lesson: &Lesson, fallback: Tz) -> ClientTimeRange {
    let tz = &lesson.client.timezone;
    ClientTimeRange {
        start: project_time_or(lesson.start_instant, tz, fallback),
        end: project_time_or(lesson.end(), tz, fallback),
    }
}

fn format_in(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(CLOCK_FORMAT).to_string()
}
