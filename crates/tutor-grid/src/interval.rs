//! Half-open interval arithmetic shared by layout, availability and conflict
//! detection.

use std::ops::Sub;

/// Whether `[a_start, a_end)` and `[b_start, b_end)` intersect.
///
/// Touching intervals (`a_end == b_start`) do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Length of the intersection, or `None` when the intervals do not overlap.
pub fn overlap<T, D>(a_start: T, a_end: T, b_start: T, b_end: T) -> Option<D>
where
    T: Ord + Copy + Sub<Output = D>,
{
    if !overlaps(a_start, a_end, b_start, b_end) {
        return None;
    }
    Some(a_end.min(b_end) - a_start.max(b_start))
}

/// Merge overlapping or adjacent intervals into a sorted, disjoint list.
pub fn merge<T: Ord + Copy>(mut intervals: Vec<(T, T)>) -> Vec<(T, T)> {
    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(T, T)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Whether `[start, end)` intersects any interval of a sorted, disjoint list.
pub fn intersects_any<T: Ord + Copy>(merged: &[(T, T)], start: T, end: T) -> bool {
    // First interval that ends after `start`; only it can intersect.
    let idx = merged.partition_point(|&(_, e)| e <= start);
    merged
        .get(idx)
        .is_some_and(|&(s, e)| overlaps(start, end, s, e))
}
