//! The ordered mark set for one video.
//!
//! Marks are kept ascending with no two entries closer than the proximity
//! tolerance. Every mutation goes through [`MarkList`] so the invariant holds
//! after each call.

use super::segments::find_within_tolerance;

/// What [`MarkList::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkToggle {
    /// A new mark was inserted at this time
    Added(f64),
    /// An existing mark at this time was removed
    Removed(f64),
}

/// Ascending list of mark timestamps, distinct up to a tolerance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkList {
    marks: Vec<f64>,
}

impl MarkList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary stored values.
    ///
    /// Non-finite and negative values are dropped, the rest sorted, and any
    /// value within `tolerance` of its predecessor discarded.
    pub fn from_values(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        let mut raw: Vec<f64> = values
            .into_iter()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .collect();
        raw.sort_by(f64::total_cmp);

        let mut marks: Vec<f64> = Vec::with_capacity(raw.len());
        for value in raw {
            match marks.last() {
                Some(&prev) if value - prev <= tolerance => continue,
                _ => marks.push(value),
            }
        }
        Self { marks }
    }

    /// The marks as an ascending slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.marks
    }

    /// Copy of the marks, for persisting.
    pub fn to_vec(&self) -> Vec<f64> {
        self.marks.clone()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Index of the first mark within `tolerance` of `time`.
    pub fn find(&self, time: f64, tolerance: f64) -> Option<usize> {
        find_within_tolerance(&self.marks, time, tolerance)
    }

    /// Remove the mark near `time`, or insert `time` if none is near.
    pub fn toggle(&mut self, time: f64, tolerance: f64) -> MarkToggle {
        match self.find(time, tolerance) {
            Some(idx) => MarkToggle::Removed(self.marks.remove(idx)),
            None => {
                let at = self.marks.partition_point(|&m| m < time);
                self.marks.insert(at, time);
                MarkToggle::Added(time)
            }
        }
    }

    /// Move mark `idx` by `delta`, clamped to `[0, duration]`.
    ///
    /// Returns the new value, or `None` if `idx` is out of range or the moved
    /// mark would land within `tolerance` of another mark (the list is left
    /// untouched in that case).
    pub fn shift(&mut self, idx: usize, delta: f64, duration: f64, tolerance: f64) -> Option<f64> {
        let old = *self.marks.get(idx)?;
        let new = (old + delta).clamp(0.0, duration.max(0.0));

        let collides = self
            .marks
            .iter()
            .enumerate()
            .any(|(i, &m)| i != idx && (m - new).abs() <= tolerance);
        if collides {
            return None;
        }

        self.marks[idx] = new;
        self.marks.sort_by(f64::total_cmp);
        Some(new)
    }

    /// Remove every mark.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn first(&self) -> Option<f64> {
        self.marks.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.marks.last().copied()
    }
}
