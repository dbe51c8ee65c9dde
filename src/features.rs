use std::collections::HashMap;

use cascade_types::{CascadeStats, DatasetRow, FeatureRecord, ThreadRow, UserBehavior, UserRow};
use chrono::{DateTime, FixedOffset};

use crate::lexical::topic_entropy;
use crate::record::ReactionRecord;
use crate::temporal::{avg_gap_minutes, burstiness, tweets_per_day, windowed_count};
use crate::tree::CascadeTree;

/// Early-engagement windows, in minutes after the root post.
pub const SHORT_WINDOW_MINUTES: i64 = 30;
pub const LONG_WINDOW_MINUTES: i64 = 60;

/// Structural + temporal statistics for one thread. The root is the
/// thread's source post and need not appear among `records`.
pub fn cascade_stats(
    root_id: &str,
    root_time: DateTime<FixedOffset>,
    records: &[ReactionRecord],
) -> CascadeStats {
    let tree = CascadeTree::build(records);
    CascadeStats {
        total_reactions: records.len(),
        reactions_30min: windowed_count(root_time, records, SHORT_WINDOW_MINUTES),
        reactions_60min: windowed_count(root_time, records, LONG_WINDOW_MINUTES),
        cascade_depth: tree.depth(root_id),
        cascade_width: tree.width(),
    }
}

/// Behaviour of one actor from their posts. `None` when fewer than two
/// posts are available; the caller decides what "absent" means downstream.
pub fn user_behavior(posts: &[ReactionRecord]) -> Option<UserBehavior> {
    if posts.len() < 2 {
        return None;
    }
    let mut times: Vec<_> = posts.iter().map(|p| p.timestamp).collect();
    times.sort();
    let texts: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();

    Some(UserBehavior {
        tweets_per_day: tweets_per_day(&times),
        avg_gap_minutes: avg_gap_minutes(&times)?,
        burstiness: burstiness(&times),
        topic_entropy: topic_entropy(&texts),
    })
}

/// One feature record per thread. `actor_posts` is chosen by the caller.
pub fn assemble(
    root_id: &str,
    root_time: DateTime<FixedOffset>,
    records: &[ReactionRecord],
    actor_posts: Option<&[ReactionRecord]>,
) -> FeatureRecord {
    let behavior = actor_posts.and_then(user_behavior);
    FeatureRecord::new(cascade_stats(root_id, root_time, records), behavior)
}

// ── Training label ──────────────────────────────────────────────────────

/// Heuristic spread-risk label used to build the training set.
#[derive(Debug, Clone, Copy)]
pub struct RiskThresholds {
    pub reactions_60min: usize,
    pub cascade_depth: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            reactions_60min: 15,
            cascade_depth: 8,
        }
    }
}

impl RiskThresholds {
    pub fn label(&self, stats: &CascadeStats) -> u8 {
        let risky = stats.reactions_60min >= self.reactions_60min
            || stats.cascade_depth >= self.cascade_depth;
        u8::from(risky)
    }
}

// ── Merge ───────────────────────────────────────────────────────────────

/// Left join of thread rows with user rows on `thread_id`; threads without
/// behaviour get zeros. The first user row for a thread id wins.
pub fn merge(threads: Vec<ThreadRow>, users: &[UserRow]) -> Vec<DatasetRow> {
    let mut by_thread: HashMap<&str, UserBehavior> = HashMap::new();
    for u in users {
        by_thread.entry(u.thread_id.as_str()).or_insert(u.behavior);
    }

    threads
        .into_iter()
        .map(|t| {
            let behavior = by_thread
                .get(t.thread_id.as_str())
                .copied()
                .unwrap_or_default();
            DatasetRow {
                event: t.event,
                thread_id: t.thread_id,
                source_type: t.source_type,
                cascade: t.cascade,
                spread_risk: t.spread_risk,
                behavior,
            }
        })
        .collect()
}
