//! Timeline dataset model.
//!
//! A [`Dataset`] bundles the metric trend series, the snapshot index they
//! are sampled on, and the event markers overlaid on the chart. Every
//! structural invariant is checked once, at construction; rendering code
//! relies on them without re-validating.

pub mod index;
pub mod scale;
pub mod scrub;
pub mod view;

use serde::{Deserialize, Serialize};

/// One recorded value of a metric. `value` is `None` when the metric was
/// not recorded at that snapshot; gaps are never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: u64,
    pub value: Option<f32>,
}

/// One metric's ordered samples, positionally correlated with every other
/// series: element `i` of each series belongs to snapshot `i`.
pub type Series = Vec<Sample>;

/// A recorded point in time shared across all series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: u64,
    pub display_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLabel {
    pub name: String,
}

/// A labeled marker attached to one snapshot, independent of metric values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub snapshot_id: u64,
    pub timestamp: u64,
    pub labels: Vec<EventLabel>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("dataset has no series")]
    EmptySeries,
    #[error("dataset has no snapshots")]
    EmptySnapshots,
    #[error("series {series} has {len} samples, expected {expected} (one per snapshot)")]
    SeriesLengthMismatch {
        series: usize,
        len: usize,
        expected: usize,
    },
    #[error("{labels} metric labels for {series} series")]
    MetricCountMismatch { labels: usize, series: usize },
    #[error("series {series} timestamps not ascending at position {position}")]
    UnsortedSeries { series: usize, position: usize },
    #[error("event timestamps not ascending at position {position}")]
    UnsortedEvents { position: usize },
    #[error("event at position {position} has no labels")]
    EmptyEventLabels { position: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidInput),
}

#[derive(Deserialize)]
struct RawDataset {
    metrics: Vec<String>,
    series: Vec<Series>,
    snapshots: Vec<Snapshot>,
    #[serde(default)]
    events: Vec<Event>,
}

/// The validated input of one chart. Owns all of its structures for the
/// chart's lifetime; nothing is shared across chart instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub series: Vec<Series>,
    pub metrics: Vec<String>,
    pub snapshots: Vec<Snapshot>,
    /// Ascending by timestamp, at most one entry per snapshot id. An empty
    /// list means the chart has no event overlay at all.
    pub events: Vec<Event>,
}

impl Dataset {
    /// Validates the raw parts and merges events that share a snapshot id
    /// (necessarily recorded at the same timestamp) into a single marker
    /// with concatenated labels.
    pub fn new(
        series: Vec<Series>,
        metrics: Vec<String>,
        snapshots: Vec<Snapshot>,
        events: Vec<Event>,
    ) -> Result<Self, InvalidInput> {
        if series.is_empty() {
            return Err(InvalidInput::EmptySeries);
        }
        if snapshots.is_empty() {
            return Err(InvalidInput::EmptySnapshots);
        }
        if metrics.len() != series.len() {
            return Err(InvalidInput::MetricCountMismatch {
                labels: metrics.len(),
                series: series.len(),
            });
        }

        let expected = snapshots.len();
        for (i, s) in series.iter().enumerate() {
            if s.len() != expected {
                return Err(InvalidInput::SeriesLengthMismatch {
                    series: i,
                    len: s.len(),
                    expected,
                });
            }
            for (pos, pair) in s.windows(2).enumerate() {
                if pair[1].timestamp < pair[0].timestamp {
                    return Err(InvalidInput::UnsortedSeries {
                        series: i,
                        position: pos + 1,
                    });
                }
            }
        }

        for (pos, pair) in events.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(InvalidInput::UnsortedEvents { position: pos + 1 });
            }
        }
        for (pos, event) in events.iter().enumerate() {
            if event.labels.is_empty() {
                return Err(InvalidInput::EmptyEventLabels { position: pos });
            }
        }

        Ok(Self {
            series,
            metrics,
            snapshots,
            events: merge_events(events),
        })
    }

    /// Parses the JSON form produced by the data backend, then validates.
    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(raw)?;
        Ok(Self::new(raw.series, raw.metrics, raw.snapshots, raw.events)?)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Position of the most recent sample. Valid because construction
    /// rejects empty snapshot lists.
    pub fn last_index(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

fn merge_events(events: Vec<Event>) -> Vec<Event> {
    let mut merged: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        match merged.last_mut() {
            Some(last) if last.snapshot_id == event.snapshot_id => {
                log::debug!(
                    "merging event labels for snapshot {}: +{}",
                    event.snapshot_id,
                    event.labels.len()
                );
                last.labels.extend(event.labels);
            }
            _ => merged.push(event),
        }
    }
    merged
}
