use chrono::{DateTime, FixedOffset};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{RecordError, ThreadError};
use crate::normalize::{from_archived_status, parse_document};
use crate::record::ReactionRecord;

/// Label directories of the reply-tree dataset. Metadata only.
const SOURCE_TYPES: &[&str] = &["rumours", "non-rumours"];

// ── Reply-tree dataset ─────────────────────────────────────────────

/// A thread directory discovered in the reply-tree dataset.
#[derive(Debug, Clone)]
pub struct ThreadDir {
    pub event: String,
    pub source_type: String,
    pub thread_id: String,
    pub path: PathBuf,
}

/// A thread with its root and every reaction that normalised cleanly.
#[derive(Debug)]
pub struct LoadedThread {
    pub root_id: String,
    pub root_time: DateTime<FixedOffset>,
    pub records: Vec<ReactionRecord>,
    /// Reaction files that were skipped
    pub skipped: usize,
}

/// Discover thread directories.
///
/// Expected directory layout:
///   {root}/{event}/{rumours|non-rumours}/{thread_id}/source-tweet/{thread_id}.json
///   {root}/{event}/{rumours|non-rumours}/{thread_id}/reactions/*.json
pub fn scan_threads(root: &Path) -> Vec<ThreadDir> {
    let mut results = Vec::new();

    for (event, event_dir) in subdirs(root) {
        for &label in SOURCE_TYPES {
            let label_dir = event_dir.join(label);
            if !label_dir.is_dir() {
                continue;
            }
            for (thread_id, path) in subdirs(&label_dir) {
                results.push(ThreadDir {
                    event: event.clone(),
                    source_type: label.to_string(),
                    thread_id,
                    path,
                });
            }
        }
    }

    results
}

/// Load one thread. A bad source file or an unlistable `reactions/`
/// directory fails the thread; a bad reaction file is logged and skipped.
pub fn load_thread(dir: &ThreadDir) -> Result<LoadedThread, ThreadError> {
    let source_path = dir
        .path
        .join("source-tweet")
        .join(format!("{}.json", dir.thread_id));
    let root = read_to_string(&source_path)
        .and_then(|content| from_archived_status(&content))
        .map_err(|source| ThreadError::Source {
            path: source_path.clone(),
            source,
        })?;

    let reactions_dir = dir.path.join("reactions");
    if !reactions_dir.is_dir() {
        return Err(ThreadError::MissingDir(reactions_dir));
    }

    let files = json_files(&reactions_dir).map_err(|source| ThreadError::ReadDir {
        path: reactions_dir.clone(),
        source,
    })?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for path in files {
        match read_to_string(&path).and_then(|content| from_archived_status(&content)) {
            Ok(r) => records.push(r),
            Err(e) => {
                warn!(thread = %dir.thread_id, file = %path.display(), "skipping reaction: {e}");
                skipped += 1;
            }
        }
    }

    Ok(LoadedThread {
        root_id: root.id,
        root_time: root.timestamp,
        records,
        skipped,
    })
}

// ── Actor-behaviour dataset ────────────────────────────────────────

/// One thread-level grouping of the actor-behaviour dataset.
#[derive(Debug, Clone)]
pub struct UserDir {
    pub event: String,
    pub thread_id: String,
    pub path: PathBuf,
}

/// Discover actor groupings.
///
/// Expected directory layout:
///   {root}/{event}/{thread_id}/*.json
/// where each file holds one JSON object or newline-delimited objects.
pub fn scan_user_dirs(root: &Path) -> Vec<UserDir> {
    let mut results = Vec::new();
    for (event, event_dir) in subdirs(root) {
        for (thread_id, path) in subdirs(&event_dir) {
            results.push(UserDir {
                event: event.clone(),
                thread_id,
                path,
            });
        }
    }
    results
}

/// Every post with a usable timestamp under `dir`. Unreadable files and
/// corrupt lines are skipped; an unlistable grouping yields no posts.
pub fn load_actor_posts(dir: &UserDir) -> Vec<ReactionRecord> {
    let mut posts = Vec::new();

    let files = match json_files(&dir.path) {
        Ok(files) => files,
        Err(e) => {
            warn!(event = %dir.event, thread = %dir.thread_id, "skipping grouping: {e}");
            return posts;
        }
    };
    for path in files {
        let content = match read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(event = %dir.event, thread = %dir.thread_id, "skipping file: {e}");
                continue;
            }
        };
        let doc = parse_document(&content);
        for skip in &doc.skipped {
            debug!(
                file = %path.display(),
                line = skip.line,
                "skipping post: {}",
                skip.reason
            );
        }
        posts.extend(doc.records);
    }

    posts
}

// ── Helpers ────────────────────────────────────────────────────────

fn read_to_string(path: &Path) -> Result<String, RecordError> {
    fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Immediate subdirectories as `(name, path)`, sorted by name. Entries
/// that cannot be read are logged and left out.
fn subdirs(dir: &Path) -> Vec<(String, PathBuf)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(dir = %dir.display(), "skipping entry: {e}");
                None
            }
        })
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            Some((name, e.into_path()))
        })
        .collect()
}

/// Immediate `*.json` files, sorted by name. Fails if the directory or
/// any of its entries cannot be listed.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(files)
}
