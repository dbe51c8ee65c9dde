use serde::{Deserialize, Serialize};

/// Column order expected by the spread-risk classifier.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "total_reactions",
    "reactions_30min",
    "reactions_60min",
    "cascade_depth",
    "cascade_width",
    "tweets_per_day",
    "avg_gap_minutes",
    "burstiness",
    "topic_entropy",
];

// ── Cascade statistics ───────────────────────────────────────────────────

/// Structural and early-engagement statistics of one reply cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStats {
    pub total_reactions: usize,
    pub reactions_30min: usize,
    pub reactions_60min: usize,
    /// Longest reply chain (in edges) below the thread root
    pub cascade_depth: usize,
    /// Largest sibling group anywhere in the thread
    pub cascade_width: usize,
}

// ── Actor behaviour ──────────────────────────────────────────────────────

/// Posting behaviour of one actor, aggregated over a thread-level grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBehavior {
    pub tweets_per_day: f64,
    pub avg_gap_minutes: f64,
    /// Most posts inside any 60-minute span
    pub burstiness: usize,
    pub topic_entropy: f64,
}

// ── Classifier input ─────────────────────────────────────────────────────

/// The fixed 9-field feature schema. User-behaviour fields are `None`
/// when the actor had fewer than two usable timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub total_reactions: usize,
    pub reactions_30min: usize,
    pub reactions_60min: usize,
    pub cascade_depth: usize,
    pub cascade_width: usize,
    pub tweets_per_day: Option<f64>,
    pub avg_gap_minutes: Option<f64>,
    pub burstiness: Option<usize>,
    pub topic_entropy: Option<f64>,
}

impl FeatureRecord {
    pub fn new(cascade: CascadeStats, behavior: Option<UserBehavior>) -> Self {
        Self {
            total_reactions: cascade.total_reactions,
            reactions_30min: cascade.reactions_30min,
            reactions_60min: cascade.reactions_60min,
            cascade_depth: cascade.cascade_depth,
            cascade_width: cascade.cascade_width,
            tweets_per_day: behavior.map(|b| b.tweets_per_day),
            avg_gap_minutes: behavior.map(|b| b.avg_gap_minutes),
            burstiness: behavior.map(|b| b.burstiness),
            topic_entropy: behavior.map(|b| b.topic_entropy),
        }
    }

    pub fn has_user_behavior(&self) -> bool {
        self.tweets_per_day.is_some()
    }

    /// Numeric row in `FEATURE_COLUMNS` order; absent behaviour fields become 0.
    pub fn model_input(&self) -> [f64; 9] {
        [
            self.total_reactions as f64,
            self.reactions_30min as f64,
            self.reactions_60min as f64,
            self.cascade_depth as f64,
            self.cascade_width as f64,
            self.tweets_per_day.unwrap_or(0.0),
            self.avg_gap_minutes.unwrap_or(0.0),
            self.burstiness.unwrap_or(0) as f64,
            self.topic_entropy.unwrap_or(0.0),
        ]
    }

    /// `(column, value)` pairs, for callers that build a named single-row frame.
    pub fn named_input(&self) -> Vec<(&'static str, f64)> {
        FEATURE_COLUMNS
            .iter()
            .copied()
            .zip(self.model_input())
            .collect()
    }
}

// ── Dataset rows (JSON output) ───────────────────────────────────────────

/// One thread of the archival reply dataset, with its training label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRow {
    pub event: String,
    pub thread_id: String,
    /// `rumours` / `non-rumours`; metadata only, never a feature
    pub source_type: String,
    #[serde(flatten)]
    pub cascade: CascadeStats,
    pub spread_risk: u8,
}

/// Actor behaviour for one thread-level grouping of the extended dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub thread_id: String,
    #[serde(flatten)]
    pub behavior: UserBehavior,
}

/// A thread row joined with its (possibly zero-filled) actor behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub event: String,
    pub thread_id: String,
    pub source_type: String,
    #[serde(flatten)]
    pub cascade: CascadeStats,
    pub spread_risk: u8,
    #[serde(flatten)]
    pub behavior: UserBehavior,
}

impl DatasetRow {
    pub fn features(&self) -> FeatureRecord {
        FeatureRecord::new(self.cascade, Some(self.behavior))
    }
}
