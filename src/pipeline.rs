//! Batch extraction over whole datasets. Every thread is an independent
//! unit: it yields a row or a skip, and nothing a failing thread does can
//! reach the rows of another.

use std::path::Path;

use cascade_types::{ThreadRow, UserRow};
use tracing::{debug, info, warn};

use crate::features::{RiskThresholds, cascade_stats, user_behavior};
use crate::scanner::{self, ThreadDir, UserDir};

/// A thread that produced no row, and why.
#[derive(Debug, Clone)]
pub struct Skipped {
    pub thread_id: String,
    pub reason: String,
}

/// Rows plus skips of one batch.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<Skipped>,
}

impl<T> BatchReport<T> {
    fn collect(results: impl IntoIterator<Item = Result<T, Skipped>>) -> Self {
        let (mut rows, mut skipped) = (Vec::new(), Vec::new());
        for r in results {
            match r {
                Ok(row) => rows.push(row),
                Err(s) => {
                    warn!(thread = %s.thread_id, "skipping thread: {}", s.reason);
                    skipped.push(s);
                }
            }
        }
        BatchReport { rows, skipped }
    }
}

// ── Reply-tree dataset → thread rows ───────────────────────────────

pub fn thread_row(dir: &ThreadDir, thresholds: &RiskThresholds) -> Result<ThreadRow, Skipped> {
    let thread = scanner::load_thread(dir).map_err(|e| Skipped {
        thread_id: dir.thread_id.clone(),
        reason: e.to_string(),
    })?;
    debug!(
        thread = %dir.thread_id,
        reactions = thread.records.len(),
        skipped = thread.skipped,
        "loaded thread"
    );

    let cascade = cascade_stats(&thread.root_id, thread.root_time, &thread.records);
    Ok(ThreadRow {
        event: dir.event.clone(),
        thread_id: dir.thread_id.clone(),
        source_type: dir.source_type.clone(),
        spread_risk: thresholds.label(&cascade),
        cascade,
    })
}

pub fn extract_threads(root: &Path, thresholds: &RiskThresholds) -> BatchReport<ThreadRow> {
    let dirs = scanner::scan_threads(root);
    info!("found {} thread directories under {}", dirs.len(), root.display());

    let report = BatchReport::collect(dirs.iter().map(|d| thread_row(d, thresholds)));
    let risky = report.rows.iter().filter(|r| r.spread_risk == 1).count();
    info!(
        "threads processed: {} ({} high risk), skipped: {}",
        report.rows.len(),
        risky,
        report.skipped.len()
    );
    report
}

// ── Actor-behaviour dataset → user rows ────────────────────────────

/// `None` when the grouping has fewer than two usable posts.
pub fn user_row(dir: &UserDir) -> Option<UserRow> {
    let posts = scanner::load_actor_posts(dir);
    user_behavior(&posts).map(|behavior| UserRow {
        thread_id: dir.thread_id.clone(),
        behavior,
    })
}

/// Reading a grouping never fails as a whole (bad files and lines are
/// skipped inside), so only groupings with too few posts drop out.
pub fn extract_users(root: &Path) -> Vec<UserRow> {
    let dirs = scanner::scan_user_dirs(root);
    info!("found {} user directories under {}", dirs.len(), root.display());

    let rows: Vec<UserRow> = dirs.iter().filter_map(user_row).collect();
    info!(
        "users processed: {}, too few posts: {}",
        rows.len(),
        dirs.len() - rows.len()
    );
    rows
}
