//! Lesson, client and label records as supplied by the persistence layer.
//!
//! The core never mutates these; it reads a snapshot per layout or availability
//! pass. [`parse_lessons_json`] is the boundary where the remote API's JSON is
//! turned into typed records.

use chrono::{DateTime, Duration, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Stable lesson identifier assigned by the persistence layer.
pub type LessonId = i64;

/// Duration assumed when a lesson carries neither an end instant nor a duration.
pub const DEFAULT_LESSON_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// IANA timezone identifier, e.g. "Europe/Moscow".
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    /// Hex color such as "#FF5733".
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// A scheduled lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub start_instant: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_instant: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    pub client: Client,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_trial: bool,
    #[serde(default)]
    pub requires_preparation: bool,
    #[serde(default)]
    pub homework_sent: bool,
}

impl Lesson {
    /// Build a lesson with the default duration and no labels or flags set.
    pub fn new(id: LessonId, start_instant: DateTime<Utc>, client: Client) -> Self {
        Self {
            id,
            start_instant,
            end_instant: None,
            duration_minutes: None,
            client,
            labels: Vec::new(),
            is_paid: false,
            is_trial: false,
            requires_preparation: false,
            homework_sent: false,
        }
    }

    /// Effective end: explicit end instant, else start + duration, else start + 60 min.
    ///
    /// May be at or before the start for malformed input; see [`Lesson::validate`].
    /// A duration too large to represent yields the start itself.
    pub fn end(&self) -> DateTime<Utc> {
        match (self.end_instant, self.duration_minutes) {
            (Some(end), _) => end,
            (None, minutes) => {
                let minutes = minutes.unwrap_or(DEFAULT_LESSON_MINUTES);
                TimeDelta::try_minutes(minutes)
                    .and_then(|d| self.start_instant.checked_add_signed(d))
                    .unwrap_or(self.start_instant)
            }
        }
    }

    pub fn duration(&self) -> Duration {
        self.end() - self.start_instant
    }

    /// Reject lessons whose effective end is not strictly after their start.
    pub fn validate(&self) -> Result<()> {
        if self.end() <= self.start_instant {
            return Err(GridError::InvalidLessonDuration { lesson_id: self.id });
        }
        Ok(())
    }

    /// The tutor-local calendar date on which the lesson starts.
    pub fn day(&self, tutor_tz: Tz) -> NaiveDate {
        tutor_tz.from_utc_datetime(&self.start_instant.naive_utc()).date_naive()
    }
}

/// Parse a JSON array of lesson records.
///
/// # Errors
/// Returns `GridError::InvalidLessonData` if the payload is not an array of
/// well-formed lesson objects.
pub fn parse_lessons_json(json: &str) -> Result<Vec<Lesson>> {
    serde_json::from_str(json).map_err(|e| GridError::InvalidLessonData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: 7,
            name: "Anna".to_string(),
            phone: "+7 900 000 00 00".to_string(),
            timezone: "Europe/Moscow".to_string(),
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn end_defaults_to_one_hour() {
        let lesson = Lesson::new(1, at("2024-06-15T09:00:00Z"), client());
        assert_eq!(lesson.end(), at("2024-06-15T10:00:00Z"));
        assert!(lesson.validate().is_ok());
    }

    #[test]
    fn explicit_end_wins_over_duration() {
        let mut lesson = Lesson::new(1, at("2024-06-15T09:00:00Z"), client());
        lesson.duration_minutes = Some(90);
        lesson.end_instant = Some(at("2024-06-15T09:45:00Z"));
        assert_eq!(lesson.duration().num_minutes(), 45);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut lesson = Lesson::new(3, at("2024-06-15T09:00:00Z"), client());
        lesson.duration_minutes = Some(0);
        assert_eq!(
            lesson.validate(),
            Err(GridError::InvalidLessonDuration { lesson_id: 3 })
        );
    }

    #[test]
    fn unrepresentable_duration_is_rejected() {
        let mut lesson = Lesson::new(4, at("2024-06-15T09:00:00Z"), client());
        for minutes in [i64::MAX, i64::MIN, i64::MAX / 60_000] {
            lesson.duration_minutes = Some(minutes);
            assert_eq!(lesson.end(), lesson.start_instant);
            assert_eq!(
                lesson.validate(),
                Err(GridError::InvalidLessonDuration { lesson_id: 4 })
            );
        }
    }

    #[test]
    fn day_follows_tutor_timezone() {
        // 22:30 UTC is already the next day in Moscow.
        let lesson = Lesson::new(1, at("2024-06-15T22:30:00Z"), client());
        assert_eq!(
            lesson.day(chrono_tz::Europe::Moscow),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
        );
        assert_eq!(
            lesson.day(chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn parses_camel_case_records_with_defaults() {
        let json = r##"[{
            "id": 12,
            "startInstant": "2024-06-15T09:00:00Z",
            "durationMinutes": 45,
            "client": {"id": 7, "name": "Anna", "timezone": "Europe/Moscow"},
            "labels": [{"id": 1, "name": "exam", "color": "#FF5733", "emoji": "🔥"}],
            "isPaid": true
        }]"##;
        let lessons = parse_lessons_json(json).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].duration().num_minutes(), 45);
        assert!(lessons[0].is_paid);
        assert!(!lessons[0].is_trial);
        assert_eq!(lessons[0].labels[0].emoji.as_deref(), Some("🔥"));
    }

    #[test]
    fn malformed_payload_is_invalid_lesson_data() {
        let err = parse_lessons_json(r#"[{"id": 1}]"#).unwrap_err();
        assert!(matches!(err, GridError::InvalidLessonData(_)));
    }
}
