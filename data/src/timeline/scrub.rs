//! Pointer-driven selection state.

use super::index::SampleIndex;

/// The snapshot position currently focused by the scrubber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Pointer is outside the chart; markers, readouts and event highlight
    /// are all hidden until it returns.
    None,
    Index(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Index(i) => Some(i),
            Selection::None => None,
        }
    }
}

/// Owns the single piece of mutable chart state. Both transitions are
/// synchronous; a `true` return means dependent visuals must redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrubber {
    selection: Selection,
}

impl Scrubber {
    /// Starts on the most recent sample.
    pub fn new(last_index: usize) -> Self {
        Self {
            selection: Selection::Index(last_index),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Snap to the nearest sample at or before `t`.
    pub fn pointer_move(&mut self, t: f64, index: &SampleIndex<'_>) -> bool {
        let next = Selection::Index(index.nearest(t));
        let changed = next != self.selection;
        self.selection = next;
        changed
    }

    /// Hide the scrubber visuals until the pointer returns.
    pub fn pointer_leave(&mut self) -> bool {
        let changed = self.selection != Selection::None;
        self.selection = Selection::None;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{Dataset, Sample, Snapshot};

    fn dataset() -> Dataset {
        let series = [0u64, 10, 20]
            .iter()
            .map(|&t| Sample {
                timestamp: t,
                value: Some(1.0),
            })
            .collect();
        let snapshots = (1..=3)
            .map(|id| Snapshot {
                id,
                display_date: format!("#{id}"),
            })
            .collect();
        Dataset::new(vec![series], vec!["m".to_string()], snapshots, vec![]).unwrap()
    }

    #[test]
    fn starts_on_the_most_recent_sample() {
        let dataset = dataset();
        let scrubber = Scrubber::new(dataset.last_index());
        assert_eq!(scrubber.selection(), Selection::Index(2));
    }

    #[test]
    fn pointer_move_snaps_and_reports_changes() {
        let dataset = dataset();
        let index = SampleIndex::new(&dataset);
        let mut scrubber = Scrubber::new(dataset.last_index());

        assert!(scrubber.pointer_move(10.0, &index));
        assert_eq!(scrubber.selection(), Selection::Index(1));

        // Same snap target again: no redraw needed.
        assert!(!scrubber.pointer_move(12.5, &index));
        assert_eq!(scrubber.selection(), Selection::Index(1));
    }

    #[test]
    fn pointer_leave_hides_the_selection() {
        let dataset = dataset();
        let index = SampleIndex::new(&dataset);
        let mut scrubber = Scrubber::new(dataset.last_index());

        assert!(scrubber.pointer_leave());
        assert_eq!(scrubber.selection(), Selection::None);
        assert!(!scrubber.pointer_leave());

        assert!(scrubber.pointer_move(0.0, &index));
        assert_eq!(scrubber.selection(), Selection::Index(0));
    }
}
