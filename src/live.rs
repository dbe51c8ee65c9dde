use cascade_types::FeatureRecord;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::RecordError;
use crate::features::assemble;
use crate::normalize::from_live_value;
use crate::record::{ReactionRecord, from_epoch_seconds};

/// A live thread as handed over by the fetcher: root post id, creation
/// time in epoch seconds, and the flattened comment list. Comments stay
/// raw until normalised so one malformed object cannot sink the thread.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveThread {
    pub id: String,
    pub created_utc: f64,
    #[serde(default)]
    pub comments: Vec<Value>,
}

impl LiveThread {
    /// Normalised comments; malformed ones and ones without a usable
    /// timestamp are logged and dropped.
    pub fn records(&self) -> Vec<ReactionRecord> {
        self.comments
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| match from_live_value(c) {
                Ok(r) => Some(r),
                Err(e) => {
                    let comment = c.get("id").and_then(Value::as_str).unwrap_or("?");
                    warn!(thread = %self.id, index = idx, comment, "skipping comment: {e}");
                    None
                }
            })
            .collect()
    }

    /// Features of a live thread. There is no actor history here, so the
    /// user-behaviour fields stay absent.
    pub fn features(&self) -> Result<FeatureRecord, RecordError> {
        let root_time = from_epoch_seconds(self.created_utc)?;
        Ok(assemble(&self.id, root_time, &self.records(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = r#"{
        "id": "post1",
        "created_utc": 1420628400.0,
        "comments": [
            {"id": "a", "parent_id": "t3_post1", "created_utc": 1420628700.0},
            {"id": "b", "parent_id": "t1_a", "created_utc": 1420629000.0, "body": "agreed"},
            {"id": "c", "parent_id": "t3_post1", "created_utc": 1420630800.0},
            {"id": "d", "parent_id": "t1_c"}
        ]
    }"#;

    #[test]
    fn test_live_thread_features() {
        let thread: LiveThread = serde_json::from_str(THREAD).unwrap();
        assert_eq!(thread.records().len(), 3);

        let f = thread.features().unwrap();
        assert_eq!(f.total_reactions, 3);
        assert_eq!(f.reactions_30min, 2);
        assert_eq!(f.reactions_60min, 3);
        assert_eq!(f.cascade_depth, 2);
        assert_eq!(f.cascade_width, 2);
        assert!(!f.has_user_behavior());
    }

    #[test]
    fn test_live_thread_without_comments() {
        let thread: LiveThread =
            serde_json::from_str(r#"{"id":"p","created_utc":1420628400}"#).unwrap();
        let f = thread.features().unwrap();
        assert_eq!(f.model_input(), [0.0; 9]);
    }

    #[test]
    fn test_live_thread_keeps_good_comments_next_to_bad_ones() {
        let thread: LiveThread = serde_json::from_str(
            r#"{
                "id": "post1",
                "created_utc": 1420628400.0,
                "comments": [
                    {"id": "a", "parent_id": "t3_post1", "created_utc": 1420628700.0},
                    {"parent_id": "t1_a", "created_utc": 1420629000.0},
                    {"id": "c", "parent_id": "t3_post1", "created_utc": "soon"},
                    "not an object"
                ]
            }"#,
        )
        .unwrap();

        let records = thread.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");

        let f = thread.features().unwrap();
        assert_eq!(f.total_reactions, 1);
        assert_eq!(f.cascade_depth, 1);
    }
}
