//! Segment arithmetic over an ascending mark list.
//!
//! A segment is the half-open interval `[marks[i], marks[i + 1])`. Every
//! function here is pure: no state, no side effects, total over all inputs
//! (including empty and single-mark lists).

/// Number of segments defined by `marks` (`marks.len() - 1`, never negative).
pub fn segment_count(marks: &[f64]) -> usize {
    marks.len().saturating_sub(1)
}

/// Start of segment `idx`, or `0.0` when `idx` is not a valid segment.
pub fn segment_start(marks: &[f64], idx: usize) -> f64 {
    if idx < segment_count(marks) {
        marks[idx]
    } else {
        0.0
    }
}

/// End of segment `idx`, or `duration` when `idx` is not a valid segment.
pub fn segment_end(marks: &[f64], idx: usize, duration: f64) -> f64 {
    if idx < segment_count(marks) {
        marks[idx + 1]
    } else {
        duration
    }
}

/// Locate the segment containing `time`.
///
/// Returns `i` with `marks[i] <= time < marks[i + 1]`. Times at or past the
/// last mark map to the last segment, times before the first mark map to
/// segment 0, and lists with fewer than two marks always yield 0.
pub fn locate(marks: &[f64], time: f64) -> usize {
    let count = segment_count(marks);
    if count == 0 {
        return 0;
    }
    // Number of marks <= time, minus one, is the segment whose start precedes time.
    let at_or_before = marks.partition_point(|&m| m <= time);
    at_or_before.saturating_sub(1).min(count - 1)
}

/// Index of the mark closest to `time`, or `None` for an empty list.
///
/// Ties resolve to the earlier mark.
pub fn find_nearest(marks: &[f64], time: f64) -> Option<usize> {
    marks
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &m)| {
            let dist = (m - time).abs();
            match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((i, dist)),
            }
        })
        .map(|(i, _)| i)
}

/// Index of the first mark within `tolerance` of `time`.
pub fn find_within_tolerance(marks: &[f64], time: f64, tolerance: f64) -> Option<usize> {
    marks.iter().position(|&m| (m - time).abs() <= tolerance)
}

/// First mark strictly after `time + tolerance`, wrapping to the first mark.
pub fn next_mark_after(marks: &[f64], time: f64, tolerance: f64) -> Option<f64> {
    marks
        .iter()
        .copied()
        .find(|&m| m > time + tolerance)
        .or_else(|| marks.first().copied())
}

/// Last mark strictly before `time - tolerance`, wrapping to the last mark.
pub fn previous_mark_before(marks: &[f64], time: f64, tolerance: f64) -> Option<f64> {
    marks
        .iter()
        .rev()
        .copied()
        .find(|&m| m < time - tolerance)
        .or_else(|| marks.last().copied())
}
