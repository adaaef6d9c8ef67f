//! Day and week view ranges, and grouping lessons into day columns.

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::Lesson;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
}

impl ViewMode {
    fn days(self) -> i64 {
        match self {
            ViewMode::Day => 1,
            ViewMode::Week => 7,
        }
    }
}

/// Lessons of one tutor-local day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLessons {
    pub day: NaiveDate,
    pub lessons: Vec<Lesson>,
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Days shown for `anchor`: the day itself, or its Monday-to-Sunday week.
pub fn visible_days(anchor: NaiveDate, mode: ViewMode) -> Vec<NaiveDate> {
    let first = match mode {
        ViewMode::Day => anchor,
        ViewMode::Week => week_start(anchor),
    };
    (0..mode.days()).map(|i| first + Duration::days(i)).collect()
}

/// Move the anchor by `steps` views (negative steps go back).
pub fn navigate(anchor: NaiveDate, mode: ViewMode, steps: i64) -> NaiveDate {
    anchor + Duration::days(mode.days() * steps)
}

/// Bucket lessons by the tutor-local day they start on.
///
/// Returns one bucket per entry of `days`, in the same order. Lessons starting
/// on other days are dropped. Within a bucket, input order is kept.
pub fn group_by_day(lessons: &[Lesson], days: &[NaiveDate], tutor_tz: Tz) -> Vec<DayLessons> {
    let mut buckets: Vec<DayLessons> = days
        .iter()
        .map(|&day| DayLessons {
            day,
            lessons: Vec::new(),
        })
        .collect();

    for lesson in lessons {
        let day = lesson.day(tutor_tz);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.day == day) {
            bucket.lessons.push(lesson.clone());
        }
    }

    buckets
}
