use std::path::PathBuf;

/// Why one raw reaction (API object, JSON file or JSON line) was skipped.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unparseable timestamp {raw:?}: {source}")]
    Timestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("epoch timestamp {0} out of range")]
    EpochOutOfRange(f64),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one whole thread was skipped. Never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    #[error("source file {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    #[error("missing directory {0}")]
    MissingDir(PathBuf),

    #[error("cannot list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
