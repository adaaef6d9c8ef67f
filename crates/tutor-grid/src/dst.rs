//! DST policies for turning tutor-local wall-clock slots into instants.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Policy for wall-clock times that are ambiguous or skipped by a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DstPolicy {
    /// Skip slots that fall in the DST gap (e.g., 2:30 AM during spring forward)
    Skip,
    /// Shift to the next valid time after the gap
    #[default]
    ShiftForward,
}

/// Resolve a tutor-local wall-clock time to an instant.
///
/// Ambiguous times (fall back) resolve to the earlier occurrence. Times inside
/// a gap (spring forward) are dropped or shifted according to `policy`.
pub fn resolve_local(local: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // Gaps are at most a couple of hours; walk forward minute by minute.
                (1..=180).find_map(|m| {
                    tz.from_local_datetime(&(local + Duration::minutes(m)))
                        .earliest()
                        .map(|dt| dt.with_timezone(&Utc))
                })
            }
        },
    }
}
