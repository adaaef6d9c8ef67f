//! Slot availability for booking and rescheduling.
//!
//! A candidate `[T, T + duration)` is occupied when it intersects the half-open
//! interval of any other lesson. The lesson being moved is excluded so that it
//! never conflicts with itself. Lessons outside working hours still block.
//!
//! Single checks scan the lesson list directly; bulk checks merge the busy
//! periods once and test every slot against the merged list.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::interval;
use crate::model::{Lesson, LessonId};
use crate::slot::{TimeSlot, SLOT_MINUTES};

/// Candidate duration used when the caller does not specify one.
pub const DEFAULT_CANDIDATE_MINUTES: i64 = 60;

/// Free/occupied verdict for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot: TimeSlot,
    pub occupied: bool,
}

/// A gap between busy periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// The interval a lesson blocks.
///
/// Lessons whose end is not after their start are clamped to one slot quantum.
pub(crate) fn busy_interval(lesson: &Lesson) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = lesson.start_instant;
    if let Err(e) = lesson.validate() {
        log::warn!("{e}; treating it as a {SLOT_MINUTES}-minute booking");
        let end = start
            .checked_add_signed(TimeDelta::minutes(SLOT_MINUTES as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        return (start, end);
    }
    (start, lesson.end())
}

/// End of a candidate starting at `start`.
///
/// Durations past the representable range saturate at the last instant.
fn candidate_end(start: DateTime<Utc>, duration_minutes: Option<i64>) -> DateTime<Utc> {
    let minutes = duration_minutes
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_CANDIDATE_MINUTES);
    TimeDelta::try_minutes(minutes)
        .and_then(|d| start.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn other_lessons<'a>(
    lessons: &'a [Lesson],
    exclude: Option<LessonId>,
) -> impl Iterator<Item = &'a Lesson> + 'a {
    lessons.iter().filter(move |l| Some(l.id) != exclude)
}

/// Whether `[start, start + duration)` intersects any lesson other than `exclude`.
///
/// `duration_minutes` defaults to 60 when `None` or not positive.
pub fn is_occupied(
    start: DateTime<Utc>,
    duration_minutes: Option<i64>,
    lessons: &[Lesson],
    exclude: Option<LessonId>,
) -> bool {
    let end = candidate_end(start, duration_minutes);
    other_lessons(lessons, exclude).any(|lesson| {
        let (l_start, l_end) = busy_interval(lesson);
        interval::overlaps(start, end, l_start, l_end)
    })
}

/// [`is_occupied`] for a tutor-local slot.
///
/// Slots inside a DST gap are shifted to the first valid instant after it.
pub fn is_slot_occupied(
    slot: &TimeSlot,
    duration_minutes: Option<i64>,
    tutor_tz: Tz,
    lessons: &[Lesson],
    exclude: Option<LessonId>,
) -> bool {
    match slot.to_instant(tutor_tz, DstPolicy::ShiftForward) {
        Some(start) => is_occupied(start, duration_minutes, lessons, exclude),
        None => true,
    }
}

/// Merged busy periods of all lessons except `exclude`, clipped to the window.
pub fn busy_periods(
    lessons: &[Lesson],
    exclude: Option<LessonId>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let intervals = other_lessons(lessons, exclude)
        .map(busy_interval)
        .filter(|&(start, end)| start < window_end && end > window_start)
        .map(|(start, end)| (start.max(window_start), end.min(window_end)))
        .collect();
    interval::merge(intervals)
}

/// Gaps between busy periods within the window, sorted by start.
pub fn free_ranges(
    lessons: &[Lesson],
    exclude: Option<LessonId>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeRange> {
    let mut free = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in busy_periods(lessons, exclude, window_start, window_end) {
        if cursor < busy_start {
            free.push(FreeRange {
                start: cursor,
                end: busy_start,
                duration_minutes: (busy_start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        free.push(FreeRange {
            start: cursor,
            end: window_end,
            duration_minutes: (window_end - cursor).num_minutes(),
        });
    }

    free
}

/// Mark every slot free or occupied in one pass over the lesson list.
///
/// Equivalent to calling [`is_slot_occupied`] for each slot.
pub fn slot_occupancy(
    slots: &[TimeSlot],
    duration_minutes: Option<i64>,
    tutor_tz: Tz,
    lessons: &[Lesson],
    exclude: Option<LessonId>,
) -> Vec<SlotStatus> {
    let intervals = other_lessons(lessons, exclude).map(busy_interval).collect();
    let merged = interval::merge(intervals);

    slots
        .iter()
        .map(|slot| {
            let occupied = match slot.to_instant(tutor_tz, DstPolicy::ShiftForward) {
                Some(start) => {
                    interval::intersects_any(&merged, start, candidate_end(start, duration_minutes))
                }
                None => true,
            };
            SlotStatus {
                slot: *slot,
                occupied,
            }
        })
        .collect()
}

/// The first free slot, in the order given, for a lesson of `duration_minutes`.
pub fn first_free_slot(
    slots: &[TimeSlot],
    duration_minutes: Option<i64>,
    tutor_tz: Tz,
    lessons: &[Lesson],
    exclude: Option<LessonId>,
) -> Option<TimeSlot> {
    slot_occupancy(slots, duration_minutes, tutor_tz, lessons, exclude)
        .into_iter()
        .find(|status| !status.occupied)
        .map(|status| status.slot)
}
