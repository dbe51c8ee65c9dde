//! Converts the three raw reaction shapes into `ReactionRecord`s.
//!
//! Callers pick the parser by where the data came from:
//!   - live thread API        → [`from_live_value`], [`from_live_comment`]
//!   - archival, one per file → [`from_archived_status`]
//!   - archival, multi-record → [`parse_document`]

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::RecordError;
use crate::record::{ReactionRecord, from_epoch_seconds, non_empty, parse_created_at};

// Live parent references look like "t1_abc" (comment) or "t3_xyz" (post).
static RE_KIND_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t\d_").expect("kind prefix regex"));

// ── Live API shape ──────────────────────────────────────────────────────

/// A comment object as delivered by the live thread fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveComment {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Strip the two-letter kind prefix from a live parent reference.
pub fn strip_kind_prefix(parent: &str) -> &str {
    match RE_KIND_PREFIX.find(parent) {
        Some(m) => &parent[m.end()..],
        None => parent,
    }
}

pub fn from_live_comment(comment: &LiveComment) -> Result<ReactionRecord, RecordError> {
    let secs = comment
        .created_utc
        .ok_or(RecordError::MissingField("created_utc"))?;
    let id = non_empty(Some(comment.id.clone())).ok_or(RecordError::MissingField("id"))?;
    let parent_id = non_empty(
        comment
            .parent_id
            .as_deref()
            .map(|p| strip_kind_prefix(p).to_string()),
    );

    Ok(ReactionRecord {
        id,
        parent_id,
        timestamp: from_epoch_seconds(secs)?,
        text: comment.body.clone().unwrap_or_default(),
    })
}

/// Normalise a raw comment object. A comment that does not even have the
/// expected field types is a skippable record, like one with no timestamp.
pub fn from_live_value(raw: &serde_json::Value) -> Result<ReactionRecord, RecordError> {
    let comment = LiveComment::deserialize(raw)?;
    from_live_comment(&comment)
}

// ── Archival shape ──────────────────────────────────────────────────────

/// The subset of an archived status object the engine reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchivedStatus {
    #[serde(default)]
    pub id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ArchivedStatus {
    fn into_record(self, require_id: bool) -> Result<ReactionRecord, RecordError> {
        let raw_time = self
            .created_at
            .ok_or(RecordError::MissingField("created_at"))?;
        let timestamp = parse_created_at(&raw_time)?;
        let id = match non_empty(self.id_str) {
            Some(id) => id,
            None if require_id => return Err(RecordError::MissingField("id_str")),
            None => String::new(),
        };

        Ok(ReactionRecord {
            id,
            parent_id: non_empty(self.in_reply_to_status_id_str),
            timestamp,
            text: self.text.unwrap_or_default(),
        })
    }
}

/// Parse one reaction file holding exactly one JSON object.
pub fn from_archived_status(content: &str) -> Result<ReactionRecord, RecordError> {
    let status: ArchivedStatus = serde_json::from_str(content)?;
    status.into_record(true)
}

// ── Best-effort multi-record documents ──────────────────────────────────

/// A record-level failure inside a document. `line` is 1-based; 0 means
/// the document parsed as a single object.
#[derive(Debug)]
pub struct LineSkip {
    pub line: usize,
    pub reason: RecordError,
}

#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub records: Vec<ReactionRecord>,
    pub skipped: Vec<LineSkip>,
}

/// Extract every usable record from a file that is either one JSON object
/// or newline-delimited JSON objects, possibly with corrupt lines.
///
/// Whole-document parse is tried first; on failure each non-empty line is
/// parsed on its own and bad lines are skipped. Ids are optional here since
/// this shape only feeds actor-behaviour features.
pub fn parse_document(content: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();

    if let Ok(status) = serde_json::from_str::<ArchivedStatus>(content) {
        match status.into_record(false) {
            Ok(r) => doc.records.push(r),
            Err(reason) => doc.skipped.push(LineSkip { line: 0, reason }),
        }
        return doc;
    }

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<ArchivedStatus>(line)
            .map_err(RecordError::from)
            .and_then(|s| s.into_record(false));
        match parsed {
            Ok(r) => doc.records.push(r),
            Err(reason) => doc.skipped.push(LineSkip {
                line: idx + 1,
                reason,
            }),
        }
    }

    doc
}
