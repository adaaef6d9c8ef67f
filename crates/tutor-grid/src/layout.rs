//! Positioned rectangles for the lessons of one day column.
//!
//! Every input lesson yields exactly one [`LessonLayout`], in input order.
//! Rectangles are clipped to the grid and never shorter than
//! [`MIN_LESSON_HEIGHT`], so zero-length or malformed lessons stay clickable.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::DayLessons;
use crate::model::{Lesson, LessonId};
use crate::time_grid::TimeGrid;

/// Minimum rendered height in pixels.
pub const MIN_LESSON_HEIGHT: f64 = 20.0;

/// How lessons that overlap in time share a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Full width, later lessons drawn on top of earlier ones.
    #[default]
    Stack,
    /// Overlapping lessons split the column width into equal sub-columns.
    SideBySide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Entirely within working hours.
    Visible,
    /// Partly outside working hours; the rectangle covers the visible part.
    Clipped,
    /// Entirely outside working hours; not drawn.
    Hidden,
}

/// Position of one lesson inside its day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonLayout {
    pub lesson_id: LessonId,
    pub top: f64,
    pub height: f64,
    /// Zero-based sub-column, always 0 under [`OverlapPolicy::Stack`].
    pub column: usize,
    /// Number of sub-columns sharing the width, always 1 under [`OverlapPolicy::Stack`].
    pub columns: usize,
    pub visibility: Visibility,
}

/// Layout of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub day: NaiveDate,
    pub lessons: Vec<LessonLayout>,
}

/// Lay out a day's lessons.
///
/// Lessons are placed by their tutor-local wall-clock time; a lesson that runs
/// past midnight keeps extending downwards and is clipped at the grid bottom.
pub fn layout_day(
    lessons: &[Lesson],
    tutor_tz: Tz,
    grid: &TimeGrid,
    policy: OverlapPolicy,
) -> Vec<LessonLayout> {
    let mut layouts: Vec<LessonLayout> = lessons
        .iter()
        .map(|lesson| place(lesson, tutor_tz, grid))
        .collect();

    if policy == OverlapPolicy::SideBySide {
        assign_columns(&mut layouts);
    }

    layouts
}

/// Lay out several days at once, one [`DayLayout`] per bucket.
pub fn layout_days(
    days: &[DayLessons],
    tutor_tz: Tz,
    grid: &TimeGrid,
    policy: OverlapPolicy,
) -> Vec<DayLayout> {
    days.iter()
        .map(|bucket| DayLayout {
            day: bucket.day,
            lessons: layout_day(&bucket.lessons, tutor_tz, grid, policy),
        })
        .collect()
}

/// Start and end as minutes since the local midnight of the start day.
fn local_span(lesson: &Lesson, tutor_tz: Tz) -> (i64, i64) {
    let start = lesson.start_instant.with_timezone(&tutor_tz).naive_local();
    let end = lesson.end().with_timezone(&tutor_tz).naive_local();
    let midnight = start.date().and_time(NaiveTime::MIN);
    ((start - midnight).num_minutes(), (end - midnight).num_minutes())
}

fn place(lesson: &Lesson, tutor_tz: Tz, grid: &TimeGrid) -> LessonLayout {
    let (start_min, mut end_min) = local_span(lesson, tutor_tz);
    if let Err(e) = lesson.validate() {
        log::warn!("{e}; rendering it at minimum height");
        end_min = start_min;
    }

    let hours = grid.working_hours();
    let grid_start = hours.start_hour() as i64 * 60;
    let grid_end = hours.end_hour() as i64 * 60;
    let total = grid.total_height();

    let hidden = start_min >= grid_end || (end_min <= grid_start && start_min < grid_start);
    if hidden {
        log::debug!("lesson {} is outside working hours", lesson.id);
        let top = if start_min >= grid_end { total } else { 0.0 };
        return LessonLayout {
            lesson_id: lesson.id,
            top,
            height: 0.0,
            column: 0,
            columns: 1,
            visibility: Visibility::Hidden,
        };
    }

    let visibility = if start_min < grid_start || end_min > grid_end {
        Visibility::Clipped
    } else {
        Visibility::Visible
    };

    let mut top = grid.offset_of_minutes(start_min).clamp(0.0, total);
    let bottom = grid.offset_of_minutes(end_min).clamp(top, total);
    let height = (bottom - top).max(MIN_LESSON_HEIGHT);
    if top + height > total {
        top = (total - height).max(0.0);
    }

    LessonLayout {
        lesson_id: lesson.id,
        top,
        height,
        column: 0,
        columns: 1,
        visibility,
    }
}

/// Greedy interval partitioning over the drawn rectangles.
///
/// Rectangles that touch or overlap transitively form a cluster; each cluster is
/// split into as many columns as it needs at its densest point.
fn assign_columns(layouts: &mut [LessonLayout]) {
    let mut order: Vec<usize> = (0..layouts.len())
        .filter(|&i| layouts[i].visibility != Visibility::Hidden)
        .collect();
    order.sort_by(|&a, &b| {
        let (la, lb) = (&layouts[a], &layouts[b]);
        la.top
            .total_cmp(&lb.top)
            .then((la.top + la.height).total_cmp(&(lb.top + lb.height)))
    });

    let mut cluster: Vec<usize> = Vec::new();
    let mut column_ends: Vec<f64> = Vec::new();
    let mut cluster_end = f64::NEG_INFINITY;

    for i in order {
        let top = layouts[i].top;
        let bottom = top + layouts[i].height;

        if top >= cluster_end && !cluster.is_empty() {
            close_cluster(layouts, &cluster, column_ends.len());
            cluster.clear();
            column_ends.clear();
        }

        let column = match column_ends.iter().position(|&end| end <= top) {
            Some(c) => {
                column_ends[c] = bottom;
                c
            }
            None => {
                column_ends.push(bottom);
                column_ends.len() - 1
            }
        };

        layouts[i].column = column;
        cluster_end = if cluster.is_empty() {
            bottom
        } else {
            cluster_end.max(bottom)
        };
        cluster.push(i);
    }

    if !cluster.is_empty() {
        close_cluster(layouts, &cluster, column_ends.len());
    }
}

fn close_cluster(layouts: &mut [LessonLayout], cluster: &[usize], columns: usize) {
    for &i in cluster {
        layouts[i].columns = columns;
    }
}
