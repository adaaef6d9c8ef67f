//! Tests for client-local clock strings.

use chrono::{DateTime, Utc};
use tutor_grid::model::{Client, Lesson};
use tutor_grid::timezone::{client_time_range, parse_timezone, project_time, project_time_or};
use tutor_grid::GridError;

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

#[test]
fn moscow_in_june_is_utc_plus_three() {
    assert_eq!(
        project_time(at("2024-06-15T09:00:00Z"), "Europe/Moscow").unwrap(),
        "12:00"
    );
}

#[test]
fn output_is_zero_padded_24_hour() {
    assert_eq!(project_time(at("2024-06-15T05:05:00Z"), "UTC").unwrap(), "05:05");
    assert_eq!(project_time(at("2024-06-15T23:59:00Z"), "UTC").unwrap(), "23:59");
}

#[test]
fn daylight_saving_is_applied_per_instant() {
    // New York switches to EDT on 2024-03-10.
    assert_eq!(
        project_time(at("2024-03-09T14:00:00Z"), "America/New_York").unwrap(),
        "09:00"
    );
    assert_eq!(
        project_time(at("2024-03-11T14:00:00Z"), "America/New_York").unwrap(),
        "10:00"
    );
}

#[test]
fn projection_can_cross_the_date_line() {
    assert_eq!(
        project_time(at("2024-06-15T20:30:00Z"), "Asia/Vladivostok").unwrap(),
        "06:30"
    );
}

#[test]
fn unknown_timezone_is_an_error() {
    assert_eq!(
        project_time(at("2024-06-15T09:00:00Z"), "Mars/Olympus"),
        Err(GridError::UnknownTimezone("Mars/Olympus".to_string()))
    );
    assert!(parse_timezone("").is_err());
}

#[test]
fn fallback_is_flagged_approximate() {
    let fallback = chrono_tz::Europe::Moscow;

    let exact = project_time_or(at("2024-06-15T09:00:00Z"), "Asia/Tokyo", fallback);
    assert_eq!(exact.text, "18:00");
    assert!(!exact.approximate);

    let approx = project_time_or(at("2024-06-15T09:00:00Z"), "Mars/Olympus", fallback);
    assert_eq!(approx.text, "12:00");
    assert!(approx.approximate);
}

#[test]
fn client_range_uses_lesson_end() {
    let client = Client {
        id: 3,
        name: "Kenji".to_string(),
        phone: String::new(),
        timezone: "Asia/Tokyo".to_string(),
    };
    let mut lesson = Lesson::new(1, at("2024-06-15T09:00:00Z"), client);
    lesson.duration_minutes = Some(90);

    let range = client_time_range(&lesson, chrono_tz::UTC);
    assert_eq!(range.start.text, "18:00");
    assert_eq!(range.end.text, "19:30");
}
