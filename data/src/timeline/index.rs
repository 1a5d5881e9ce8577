//! Nearest-sample lookup for the scrubber.

use super::{Dataset, Sample};

/// Ordered timestamp keys of the reference series. All series share sample
/// positions, so the first series is canonical.
#[derive(Debug, Clone, Copy)]
pub struct SampleIndex<'a> {
    samples: &'a [Sample],
}

impl<'a> SampleIndex<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            samples: &dataset.series[0],
        }
    }

    /// Largest index whose timestamp does not exceed `t`, or `0` when `t`
    /// precedes the first sample. Binary search; nothing is rescanned per
    /// pointer move.
    pub fn nearest(&self, t: f64) -> usize {
        self.samples
            .partition_point(|s| (s.timestamp as f64) <= t)
            .saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Snapshot;

    fn dataset(timestamps: &[u64]) -> Dataset {
        let series = timestamps
            .iter()
            .map(|&t| Sample {
                timestamp: t,
                value: Some(1.0),
            })
            .collect();
        let snapshots = (0..timestamps.len())
            .map(|i| Snapshot {
                id: i as u64 + 1,
                display_date: format!("day {i}"),
            })
            .collect();
        Dataset::new(vec![series], vec!["m".to_string()], snapshots, vec![]).unwrap()
    }

    #[test]
    fn exact_timestamps_return_their_own_index() {
        let dataset = dataset(&[0, 10, 20, 35]);
        let index = SampleIndex::new(&dataset);
        for (i, t) in [0.0, 10.0, 20.0, 35.0].into_iter().enumerate() {
            assert_eq!(index.nearest(t), i);
        }
    }

    #[test]
    fn misses_resolve_to_the_closest_sample_below() {
        let dataset = dataset(&[0, 10, 20]);
        let index = SampleIndex::new(&dataset);
        assert_eq!(index.nearest(9.99), 0);
        assert_eq!(index.nearest(10.01), 1);
        assert_eq!(index.nearest(19.0), 1);
    }

    #[test]
    fn clamps_at_both_ends() {
        let dataset = dataset(&[100, 200, 300]);
        let index = SampleIndex::new(&dataset);
        assert_eq!(index.nearest(-50.0), 0);
        assert_eq!(index.nearest(99.0), 0);
        assert_eq!(index.nearest(10_000.0), 2);
    }

    #[test]
    fn nearest_is_monotonic() {
        let dataset = dataset(&[0, 7, 13, 40, 41, 90]);
        let index = SampleIndex::new(&dataset);
        let mut prev = 0;
        for step in 0..200 {
            let t = f64::from(step) * 0.5 - 5.0;
            let i = index.nearest(t);
            assert!(i >= prev, "nearest not monotonic at t={t}");
            prev = i;
        }
    }
}
