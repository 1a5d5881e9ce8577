//! Linear scale derivation for the timeline panel.
//!
//! One shared time scale maps the union of all series timestamps onto the
//! panel width; each series gets its own value scale so metrics with
//! unrelated units still fill the plot. Value ranges run bottom-up, from
//! [`MARKER_MARGIN`] to the plot height; the widget flips them into screen
//! coordinates when drawing.

use super::Dataset;

/// Top inset of every value range, reserved so markers and header text
/// never clip against the plot edge.
pub const MARKER_MARGIN: f32 = 20.0;

/// Horizontal inset on each side of the panel.
pub const SIDE_MARGIN: f32 = 20.0;

/// Plot height used when the caller does not configure one.
pub const DEFAULT_PLOT_HEIGHT: f32 = 80.0;

const HEADER_BASE: f32 = 4.0;
const HEADER_ROW: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    /// A degenerate domain (single sample, or a constant series) is widened
    /// symmetrically by 0.5 so `map` and `invert` stay finite.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let domain = if domain.0 == domain.1 {
            (domain.0 - 0.5, domain.1 + 0.5)
        } else {
            domain
        };
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f32 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t as f32 * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f32) -> f64 {
        let t = f64::from((px - self.range.0) / (self.range.1 - self.range.0));
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }
}

/// Chart geometry derived from the configured plot height and the shape of
/// the data. The header grows one row per series, with a second row
/// reserved for the event readout when events are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub width: f32,
    pub plot_height: f32,
    pub header_height: f32,
}

impl PanelLayout {
    pub fn new(
        container_width: f32,
        plot_height: f32,
        series_count: usize,
        has_events: bool,
    ) -> Self {
        let rows = series_count.max(if has_events { 2 } else { 1 });
        Self {
            width: (container_width - 2.0 * SIDE_MARGIN).max(0.0),
            plot_height,
            header_height: HEADER_BASE + HEADER_ROW * rows as f32,
        }
    }

    pub fn total_height(&self) -> f32 {
        self.header_height + self.plot_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub time: LinearScale,
    /// Indexed by series position, same order as `Dataset::series`.
    pub values: Vec<LinearScale>,
}

impl Scales {
    pub fn compute(dataset: &Dataset, panel: &PanelLayout) -> Self {
        let mut t_min = f64::INFINITY;
        let mut t_max = f64::NEG_INFINITY;
        for series in &dataset.series {
            for sample in series {
                t_min = t_min.min(sample.timestamp as f64);
                t_max = t_max.max(sample.timestamp as f64);
            }
        }

        let values = dataset
            .series
            .iter()
            .map(|series| {
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for sample in series {
                    if let Some(v) = sample.value {
                        lo = lo.min(f64::from(v));
                        hi = hi.max(f64::from(v));
                    }
                }
                // A series with no recorded value at all still gets a scale;
                // every marker for it sits on the gap fallback anyway.
                if lo > hi {
                    lo = 0.0;
                    hi = 0.0;
                }
                LinearScale::new((lo, hi), (MARKER_MARGIN, panel.plot_height))
            })
            .collect();

        Self {
            time: LinearScale::new((t_min, t_max), (0.0, panel.width)),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{Sample, Snapshot};

    fn dataset(series: Vec<Vec<Sample>>) -> Dataset {
        let len = series[0].len();
        let metrics = (0..series.len()).map(|i| format!("m{i}")).collect();
        let snapshots = (0..len)
            .map(|i| Snapshot {
                id: i as u64 + 1,
                display_date: format!("day {i}"),
            })
            .collect();
        Dataset::new(series, metrics, snapshots, vec![]).unwrap()
    }

    fn sample(timestamp: u64, value: f32) -> Sample {
        Sample {
            timestamp,
            value: Some(value),
        }
    }

    #[test]
    fn range_endpoints_are_exact() {
        let dataset = dataset(vec![
            vec![sample(0, 10.0), sample(10, 20.0), sample(20, 15.0)],
            vec![sample(0, 1.0), sample(10, 2.0), sample(20, 3.0)],
        ]);
        let panel = PanelLayout::new(640.0, 80.0, 2, false);
        let scales = Scales::compute(&dataset, &panel);

        assert_eq!(scales.time.range(), (0.0, 600.0));
        for value in &scales.values {
            assert_eq!(value.range(), (MARKER_MARGIN, 80.0));
        }

        assert_eq!(scales.time.map(0.0), 0.0);
        assert_eq!(scales.time.map(20.0), 600.0);
        assert_eq!(scales.values[0].map(10.0), MARKER_MARGIN);
        assert_eq!(scales.values[0].map(20.0), 80.0);
    }

    #[test]
    fn degenerate_domains_stay_usable() {
        // Single sample: both the time and value domains collapse.
        let single = dataset(vec![vec![sample(100, 5.0)]]);
        let panel = PanelLayout::new(240.0, 80.0, 1, false);
        let scales = Scales::compute(&single, &panel);

        // Widening touches the domain only; the ranges stay exact.
        assert_eq!(scales.time.range(), (0.0, panel.width));
        assert_eq!(scales.values[0].range(), (MARKER_MARGIN, 80.0));

        let x = scales.time.map(100.0);
        assert!(x.is_finite());
        assert_eq!(x, panel.width / 2.0);

        let y = scales.values[0].map(5.0);
        assert!(y.is_finite());
        assert_eq!(y, (MARKER_MARGIN + 80.0) / 2.0);

        // Constant series: zero variance on the value axis only.
        let flat = dataset(vec![vec![sample(0, 7.0), sample(10, 7.0)]]);
        let scales = Scales::compute(&flat, &panel);
        assert!(scales.values[0].map(7.0).is_finite());
    }

    #[test]
    fn all_gap_series_gets_a_scale() {
        let gap = Sample {
            timestamp: 0,
            value: None,
        };
        let gap2 = Sample {
            timestamp: 10,
            value: None,
        };
        let dataset = dataset(vec![vec![gap, gap2]]);
        let panel = PanelLayout::new(240.0, 80.0, 1, false);
        let scales = Scales::compute(&dataset, &panel);
        assert!(scales.values[0].map(0.0).is_finite());
    }

    #[test]
    fn invert_is_the_inverse_of_map() {
        let scale = LinearScale::new((1_000.0, 5_000.0), (0.0, 400.0));
        for t in [1_000.0, 2_345.0, 5_000.0] {
            let roundtrip = scale.invert(scale.map(t));
            assert!((roundtrip - t).abs() < 1e-3, "{roundtrip} != {t}");
        }
    }

    #[test]
    fn header_grows_with_series_and_events() {
        assert_eq!(PanelLayout::new(100.0, 80.0, 1, false).header_height, 22.0);
        assert_eq!(PanelLayout::new(100.0, 80.0, 1, true).header_height, 40.0);
        assert_eq!(PanelLayout::new(100.0, 80.0, 3, true).header_height, 58.0);
        assert_eq!(
            PanelLayout::new(100.0, 80.0, 2, false).total_height(),
            40.0 + 80.0
        );
    }
}
