//! Tests for placing a day's lessons on the grid.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tutor_grid::layout::{layout_day, OverlapPolicy, Visibility, MIN_LESSON_HEIGHT};
use tutor_grid::find_conflicts;
use tutor_grid::model::{parse_lessons_json, Client, Lesson};
use tutor_grid::time_grid::{TimeGrid, WorkingHours, ZoomTable};

// ── Helpers ─────────────────────────────────────────────────────────────────

const UTC: Tz = chrono_tz::UTC;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, hour, minute, 0).unwrap()
}

fn lesson(id: i64, start: (u32, u32), minutes: Option<i64>) -> Lesson {
    let client = Client {
        id: 1,
        name: "Oleg".to_string(),
        phone: String::new(),
        timezone: "Europe/Moscow".to_string(),
    };
    let mut l = Lesson::new(id, at(start.0, start.1), client);
    l.duration_minutes = minutes;
    l
}

/// Working hours 8–22 at 60 px per hour.
fn grid() -> TimeGrid {
    TimeGrid::new(WorkingHours::default(), 3, &ZoomTable::default()).unwrap()
}

// ── Geometry ────────────────────────────────────────────────────────────────

#[test]
fn lesson_from_ten_to_eleven_at_sixty_px() {
    let layouts = layout_day(&[lesson(1, (10, 0), Some(60))], UTC, &grid(), OverlapPolicy::Stack);

    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].lesson_id, 1);
    assert_eq!(layouts[0].top, 120.0);
    assert_eq!(layouts[0].height, 60.0);
    assert_eq!(layouts[0].visibility, Visibility::Visible);
}

#[test]
fn missing_end_and_duration_is_one_hour_tall() {
    for zoom in 1..=5 {
        let g = TimeGrid::new(WorkingHours::default(), zoom, &ZoomTable::default()).unwrap();
        let layouts = layout_day(&[lesson(1, (12, 0), None)], UTC, &g, OverlapPolicy::Stack);
        assert_eq!(layouts[0].height, g.pixels_per_hour());
    }
}

#[test]
fn layout_uses_tutor_local_wall_clock() {
    // 07:00 UTC is 10:00 in Moscow.
    let moscow: Tz = chrono_tz::Europe::Moscow;
    let layouts = layout_day(&[lesson(1, (7, 0), None)], moscow, &grid(), OverlapPolicy::Stack);

    assert_eq!(layouts[0].top, 120.0);
}

#[test]
fn short_lesson_gets_minimum_height() {
    let layouts = layout_day(&[lesson(1, (10, 0), Some(5))], UTC, &grid(), OverlapPolicy::Stack);

    assert_eq!(layouts[0].top, 120.0);
    assert_eq!(layouts[0].height, MIN_LESSON_HEIGHT);
}

#[test]
fn invalid_duration_is_clamped_not_dropped() {
    let layouts = layout_day(
        &[lesson(1, (10, 0), Some(0)), lesson(2, (11, 0), Some(-30))],
        UTC,
        &grid(),
        OverlapPolicy::Stack,
    );

    assert_eq!(layouts.len(), 2);
    for layout in &layouts {
        assert_eq!(layout.height, MIN_LESSON_HEIGHT);
        assert_eq!(layout.visibility, Visibility::Visible);
    }
    assert_eq!(layouts[1].top, 180.0);
}

#[test]
fn unrepresentable_duration_from_json_is_clamped() {
    let json = r#"[{
        "id": 9,
        "startInstant": "2024-06-15T10:00:00Z",
        "durationMinutes": 9223372036854775807,
        "client": {"id": 1, "name": "Oleg", "timezone": "Europe/Moscow"}
    }]"#;
    let lessons = parse_lessons_json(json).unwrap();
    let layouts = layout_day(&lessons, UTC, &grid(), OverlapPolicy::SideBySide);

    assert_eq!(layouts.len(), 1);
    assert_eq!(layouts[0].top, 120.0);
    assert_eq!(layouts[0].height, MIN_LESSON_HEIGHT);
    assert!(find_conflicts(&lessons).is_empty());
}

#[test]
fn short_lesson_at_grid_end_stays_inside() {
    let g = grid();
    let layouts = layout_day(&[lesson(1, (21, 55), Some(5))], UTC, &g, OverlapPolicy::Stack);

    assert_eq!(layouts[0].height, MIN_LESSON_HEIGHT);
    assert_eq!(layouts[0].top + layouts[0].height, g.total_height());
}

// ── Clipping ────────────────────────────────────────────────────────────────

#[test]
fn lesson_starting_before_grid_is_clipped_at_top() {
    // 07:30-08:30 shows only 08:00-08:30.
    let layouts = layout_day(&[lesson(1, (7, 30), Some(60))], UTC, &grid(), OverlapPolicy::Stack);

    assert_eq!(layouts[0].top, 0.0);
    assert_eq!(layouts[0].height, 30.0);
    assert_eq!(layouts[0].visibility, Visibility::Clipped);
}

#[test]
fn lesson_running_past_grid_is_clipped_at_bottom() {
    let g = grid();
    // 21:00-23:00 shows only 21:00-22:00.
    let layouts = layout_day(&[lesson(1, (21, 0), Some(120))], UTC, &g, OverlapPolicy::Stack);

    assert_eq!(layouts[0].top, 13.0 * 60.0);
    assert_eq!(layouts[0].top + layouts[0].height, g.total_height());
    assert_eq!(layouts[0].visibility, Visibility::Clipped);
}

#[test]
fn lessons_outside_working_hours_are_hidden() {
    let layouts = layout_day(
        &[
            lesson(1, (7, 0), Some(60)),  // ends at grid start
            lesson(2, (22, 0), Some(60)), // starts at grid end
            lesson(3, (23, 30), None),    // runs past midnight
        ],
        UTC,
        &grid(),
        OverlapPolicy::Stack,
    );

    assert_eq!(layouts.len(), 3);
    assert!(layouts
        .iter()
        .all(|l| l.visibility == Visibility::Hidden && l.height == 0.0));
}

// ── Overlap policies ────────────────────────────────────────────────────────

#[test]
fn stacking_keeps_full_width_and_input_order() {
    let lessons = vec![
        lesson(5, (9, 30), None),
        lesson(3, (9, 0), None),
        lesson(9, (15, 0), None),
    ];

    let layouts = layout_day(&lessons, UTC, &grid(), OverlapPolicy::Stack);

    let ids: Vec<i64> = layouts.iter().map(|l| l.lesson_id).collect();
    assert_eq!(ids, vec![5, 3, 9]);
    assert!(layouts.iter().all(|l| l.column == 0 && l.columns == 1));
}

#[test]
fn side_by_side_splits_overlapping_cluster() {
    let lessons = vec![
        lesson(1, (9, 0), None),  // 09:00-10:00
        lesson(2, (9, 30), None), // 09:30-10:30
        lesson(3, (10, 0), None), // 10:00-11:00, reuses column 0
        lesson(4, (13, 0), None), // separate cluster
    ];

    let layouts = layout_day(&lessons, UTC, &grid(), OverlapPolicy::SideBySide);

    let cols: Vec<(usize, usize)> = layouts.iter().map(|l| (l.column, l.columns)).collect();
    assert_eq!(cols, vec![(0, 2), (1, 2), (0, 2), (0, 1)]);
}

#[test]
fn side_by_side_leaves_back_to_back_lessons_full_width() {
    let lessons = vec![lesson(1, (9, 0), None), lesson(2, (10, 0), None)];

    let layouts = layout_day(&lessons, UTC, &grid(), OverlapPolicy::SideBySide);

    assert!(layouts.iter().all(|l| l.column == 0 && l.columns == 1));
}

#[test]
fn empty_day_yields_no_records() {
    assert!(layout_day(&[], UTC, &grid(), OverlapPolicy::SideBySide).is_empty());
}
