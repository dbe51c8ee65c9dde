use chrono::{DateTime, Duration, FixedOffset, TimeDelta};

use crate::record::ReactionRecord;

/// Span used by [`burstiness`].
pub const BURST_WINDOW_SECS: i64 = 3600;

/// Reactions with `timestamp <= root_time + minutes`. Reactions stamped
/// before the root are counted too. A window reaching past the
/// representable range covers everything.
pub fn windowed_count(
    root_time: DateTime<FixedOffset>,
    records: &[ReactionRecord],
    minutes: i64,
) -> usize {
    let cutoff = TimeDelta::try_minutes(minutes).and_then(|w| root_time.checked_add_signed(w));
    match cutoff {
        Some(cutoff) => records.iter().filter(|r| r.timestamp <= cutoff).count(),
        None if minutes < 0 => 0,
        None => records.len(),
    }
}

/// Most timestamps inside any 60-minute span that starts at one of them.
///
/// Input need not be sorted. Returns 1 for fewer than two timestamps.
pub fn burstiness(timestamps: &[DateTime<FixedOffset>]) -> usize {
    if timestamps.len() < 2 {
        return 1;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort();

    // two-pointer scan: `end` only moves forward, same maximum as
    // restarting from every start index
    let window = Duration::seconds(BURST_WINDOW_SECS);
    let mut best = 1;
    let mut end = 0;
    for start in 0..sorted.len() {
        if end < start {
            end = start;
        }
        while end + 1 < sorted.len() && sorted[end + 1] - sorted[start] <= window {
            end += 1;
        }
        best = best.max(end - start + 1);
    }
    best
}

/// Mean gap between consecutive sorted timestamps, in minutes.
/// `None` for fewer than two timestamps.
pub fn avg_gap_minutes(sorted: &[DateTime<FixedOffset>]) -> Option<f64> {
    if sorted.len() < 2 {
        return None;
    }
    let total: f64 = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_milliseconds() as f64 / 60_000.0)
        .sum();
    Some(total / (sorted.len() - 1) as f64)
}

/// Posts per inclusive calendar day between the first and last post.
///
/// Both dates are taken in the first timestamp's offset so a mixed-offset
/// series still yields one consistent calendar.
///
/// Counts calendar dates, not elapsed whole days, so a run crossing midnight
/// scores higher than in datasets built with the elapsed-day rule.
pub fn tweets_per_day(sorted: &[DateTime<FixedOffset>]) -> f64 {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    let first_date = first.date_naive();
    let last_date = last.with_timezone(first.offset()).date_naive();
    let days = (last_date - first_date).num_days() + 1;
    sorted.len() as f64 / days.max(1) as f64
}
