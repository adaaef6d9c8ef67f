//! Detect double-booked lessons.
//!
//! The grid stacks overlapping lessons, which hides double bookings; this report
//! lets the presentation layer flag them. Adjacent lessons (one ends exactly when
//! another starts) are NOT conflicts.

use serde::Serialize;

use crate::availability::busy_interval;
use crate::interval;
use crate::model::{Lesson, LessonId};

/// Two lessons whose time ranges overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub lesson_a: LessonId,
    pub lesson_b: LessonId,
    pub overlap_minutes: i64,
}

/// Find every unordered pair of overlapping lessons.
///
/// Pairs are reported in input order: `lesson_a` precedes `lesson_b` in `lessons`.
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(lessons: &[Lesson]) -> Vec<Conflict> {
    let intervals: Vec<_> = lessons.iter().map(busy_interval).collect();
    let mut conflicts = Vec::new();

    for (i, a) in lessons.iter().enumerate() {
        let (a_start, a_end) = intervals[i];
        for (j, b) in lessons.iter().enumerate().skip(i + 1) {
            let (b_start, b_end) = intervals[j];
            if let Some(overlap) = interval::overlap(a_start, a_end, b_start, b_end) {
                conflicts.push(Conflict {
                    lesson_a: a.id,
                    lesson_b: b.id,
                    overlap_minutes: overlap.num_minutes(),
                });
            }
        }
    }

    conflicts
}
