//! Declarative frame content for the current selection.
//!
//! [`visual_state`] is a pure function of the dataset and the selection:
//! the widget asks for it after every scrubber transition and draws exactly
//! what it returns. Computing it twice for the same inputs yields the same
//! frame, so a re-render never accumulates state.

use super::{Dataset, Event, scrub::Selection};

/// Marker for one series at the selected snapshot. `value` is `None` for a
/// gap; the renderer pins such markers to the bottom of the plot area
/// instead of omitting the dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesMarker {
    pub series: usize,
    pub timestamp: u64,
    pub value: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventHighlight {
    /// Position of the highlighted event in `Dataset::events`.
    pub event: usize,
    /// Promoted label: the first event name, suffixed with `(... +K)` when
    /// the marker carries K extra labels.
    pub label: String,
}

/// Everything the overlay layer draws for one selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub markers: Vec<SeriesMarker>,
    /// One `"<metric>: <value>"` line per series, header order.
    pub readouts: Vec<String>,
    pub date_label: Option<String>,
    pub highlight: Option<EventHighlight>,
}

pub fn visual_state(dataset: &Dataset, selection: Selection) -> VisualState {
    let Some(index) = selection.index() else {
        return VisualState::default();
    };
    let index = index.min(dataset.last_index());

    let markers = dataset
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| SeriesMarker {
            series: i,
            timestamp: series[index].timestamp,
            value: series[index].value,
        })
        .collect();

    let readouts = dataset
        .series
        .iter()
        .zip(&dataset.metrics)
        .map(|(series, metric)| match series[index].value {
            Some(value) => format!("{metric}: {value:.2}"),
            None => format!("{metric}: -"),
        })
        .collect();

    let snapshot = &dataset.snapshots[index];
    let highlight = dataset
        .events
        .iter()
        .position(|event| event.snapshot_id == snapshot.id)
        .map(|pos| EventHighlight {
            event: pos,
            label: promoted_label(&dataset.events[pos]),
        });

    VisualState {
        markers,
        readouts,
        date_label: Some(snapshot.display_date.clone()),
        highlight,
    }
}

fn promoted_label(event: &Event) -> String {
    // Construction rejects label-less events, but stay total anyway.
    let first = event.labels.first().map_or("", |l| l.name.as_str());
    match event.labels.len() {
        0 | 1 => first.to_string(),
        n => format!("{first} (... +{})", n - 1),
    }
}
