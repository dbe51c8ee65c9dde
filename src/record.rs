use chrono::{DateTime, FixedOffset, Utc};

use crate::error::RecordError;

/// Textual timestamp layout of archival records, e.g.
/// `Wed Jan 07 11:11:33 +0000 2015`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// One reply in a thread, after normalisation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    /// Unique within a thread only
    pub id: String,
    /// `None` = replies to the root directly, or parent unknown
    pub parent_id: Option<String>,
    /// Source offset is preserved
    pub timestamp: DateTime<FixedOffset>,
    pub text: String,
}

/// Parse an archival `created_at` value, keeping its UTC offset.
pub fn parse_created_at(raw: &str) -> Result<DateTime<FixedOffset>, RecordError> {
    DateTime::parse_from_str(raw.trim(), CREATED_AT_FORMAT).map_err(|source| {
        RecordError::Timestamp {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Convert fractional epoch seconds (live API) to a UTC-offset timestamp.
pub fn from_epoch_seconds(secs: f64) -> Result<DateTime<FixedOffset>, RecordError> {
    if !secs.is_finite() {
        return Err(RecordError::EpochOutOfRange(secs));
    }
    let millis = (secs * 1000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.fixed_offset())
        .ok_or(RecordError::EpochOutOfRange(secs))
}

/// Treat empty / whitespace-only ids as absent.
pub(crate) fn non_empty(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_created_at_keeps_offset() {
        let t = parse_created_at("Wed Jan 07 11:11:33 +0530 2015").unwrap();
        assert_eq!(t.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!((t.year(), t.month(), t.day()), (2015, 1, 7));
        assert_eq!((t.hour(), t.minute(), t.second()), (11, 11, 33));
    }

    #[test]
    fn test_parse_created_at_rejects_other_formats() {
        assert!(parse_created_at("2015-01-07T11:11:33Z").is_err());
        assert!(parse_created_at("").is_err());
    }

    #[test]
    fn test_from_epoch_seconds() {
        let t = from_epoch_seconds(1_420_629_093.0).unwrap();
        assert_eq!(t.timestamp(), 1_420_629_093);
        assert_eq!(t.offset().local_minus_utc(), 0);
        assert!(from_epoch_seconds(f64::NAN).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("12".into())), Some("12".into()));
    }
}
