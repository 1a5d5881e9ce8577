pub mod timeline;

use chrono::{TimeZone, Utc};

const HOUR_MS: u64 = 60 * 60 * 1_000;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Step candidates for the x-axis, finest first. Snapshot histories span
/// hours at the very least, so nothing below an hour is offered.
const TICK_STEPS_MS: &[u64] = &[
    HOUR_MS,
    2 * HOUR_MS,
    6 * HOUR_MS,
    12 * HOUR_MS,
    DAY_MS,
    2 * DAY_MS,
    7 * DAY_MS,
    14 * DAY_MS,
    30 * DAY_MS,
    90 * DAY_MS,
    182 * DAY_MS,
    365 * DAY_MS,
];

/// Smallest candidate step keeping neighbouring ticks at least `min_px`
/// apart at the given resolution.
fn tick_step(px_per_ms: f32, min_px: f32) -> u64 {
    for &candidate in TICK_STEPS_MS {
        if candidate as f32 * px_per_ms >= min_px {
            return candidate;
        }
    }
    365 * DAY_MS
}

/// Step-aligned tick timestamps covering `[min_t, max_t]`, and the step
/// that was chosen.
pub fn time_ticks(min_t: u64, max_t: u64, px_per_ms: f32, min_px: f32) -> (Vec<u64>, u64) {
    let step = tick_step(px_per_ms, min_px);
    let first = if min_t.is_multiple_of(step) {
        min_t
    } else {
        (min_t / step + 1) * step
    };

    let mut ticks = Vec::new();
    let mut t = first;
    while t <= max_t && ticks.len() < 512 {
        ticks.push(t);
        t = t.saturating_add(step);
    }
    (ticks, step)
}

/// Granularity-matched label for one tick.
pub fn format_time_label(ts_ms: u64, step_ms: u64) -> String {
    let Some(dt) = Utc.timestamp_millis_opt(ts_ms as i64).single() else {
        return ts_ms.to_string();
    };

    if step_ms < DAY_MS {
        dt.format("%b %-d %H:%M").to_string()
    } else if step_ms < 30 * DAY_MS {
        dt.format("%b %-d").to_string()
    } else if step_ms < 365 * DAY_MS {
        dt.format("%b %Y").to_string()
    } else {
        dt.format("%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_align_to_the_step() {
        let (ticks, step) = time_ticks(DAY_MS + 1, 10 * DAY_MS, 0.00001, 80.0);
        assert!(!ticks.is_empty());
        for tick in &ticks {
            assert!(tick.is_multiple_of(step));
            assert!(*tick >= DAY_MS + 1 && *tick <= 10 * DAY_MS);
        }
    }

    #[test]
    fn wider_pixels_pick_finer_steps() {
        let coarse = tick_step(0.000001, 80.0);
        let fine = tick_step(1.0, 80.0);
        assert!(fine < coarse);
    }

    #[test]
    fn labels_match_granularity() {
        // 2021-07-21 00:01 UTC
        let ts = 1_626_825_660_000;
        assert_eq!(format_time_label(ts, 7 * DAY_MS), "Jul 21");
        assert_eq!(format_time_label(ts, 90 * DAY_MS), "Jul 2021");
        assert_eq!(format_time_label(ts, 365 * DAY_MS), "2021");
    }
}
