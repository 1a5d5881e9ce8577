//! Built-in demo dataset shown when no file is given.

use chrono::{TimeZone, Utc};
use data::timeline::{Dataset, Event, EventLabel, InvalidInput, Sample, Series, Snapshot};

/// Monday 2025-01-06 00:01:00 UTC.
const BASE_MS: u64 = 1_736_121_660_000;
const WEEK_MS: u64 = 7 * 24 * 60 * 60 * 1_000;
const WEEKS: usize = 26;

pub fn dataset() -> Result<Dataset, InvalidInput> {
    let timestamps: Vec<u64> = (0..WEEKS).map(|i| BASE_MS + i as u64 * WEEK_MS).collect();

    let coverage = series(&timestamps, |i| {
        // slow climb with a dip mid-history
        let dip = if (10..13).contains(&i) { -6.5 } else { 0.0 };
        Some(62.0 + i as f32 * 0.7 + dip + wobble(i, 3.0))
    });

    let lines_of_code = series(&timestamps, |i| {
        // the analyzer was down for two snapshots
        if i == 7 || i == 8 {
            None
        } else {
            Some(1_480.0 + i as f32 * 22.0 + wobble(i, 40.0))
        }
    });

    let snapshots = timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| Snapshot {
            id: 1_000 + i as u64,
            display_date: display_date(ts),
        })
        .collect();

    let events = vec![
        event(&timestamps, 4, 1_004, &["2.4.0"]),
        event(&timestamps, 12, 1_012, &["2.5.0-RC1", "Quality profile change"]),
        event(&timestamps, 21, 1_021, &["2.5.0"]),
    ];

    Dataset::new(
        vec![coverage, lines_of_code],
        vec!["Coverage".to_string(), "Lines of code".to_string()],
        snapshots,
        events,
    )
}

fn series(timestamps: &[u64], value: impl Fn(usize) -> Option<f32>) -> Series {
    timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| Sample {
            timestamp,
            value: value(i),
        })
        .collect()
}

/// Deterministic jitter; the demo must render the same on every launch.
fn wobble(i: usize, amplitude: f32) -> f32 {
    let phase = (i * 7 % 11) as f32 / 11.0;
    (phase - 0.5) * amplitude
}

fn event(timestamps: &[u64], index: usize, snapshot_id: u64, names: &[&str]) -> Event {
    Event {
        snapshot_id,
        timestamp: timestamps[index],
        labels: names
            .iter()
            .map(|name| EventLabel {
                name: (*name).to_string(),
            })
            .collect(),
    }
}

fn display_date(ts_ms: u64) -> String {
    Utc.timestamp_millis_opt(ts_ms as i64)
        .single()
        .map_or_else(
            || ts_ms.to_string(),
            |dt| dt.format("%B %-d, %Y %H:%M").to_string(),
        )
}
