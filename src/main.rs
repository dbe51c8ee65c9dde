mod error;
mod features;
mod lexical;
mod live;
mod normalize;
mod pipeline;
mod record;
mod scanner;
mod temporal;
mod tree;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cascade_types::{DatasetRow, FEATURE_COLUMNS, ThreadRow, UserBehavior, UserRow};
use clap::{Parser, Subcommand};
use tracing::info;

use features::RiskThresholds;

#[derive(Parser)]
#[command(
    name = "cascade_risk",
    about = "Early spread-risk features for reply cascades"
)]
struct Cli {
    /// Directory for JSON outputs
    #[arg(long, global = true, env = "CASCADE_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reply-tree dataset → threads.json (cascade features + risk label)
    Threads {
        /// Dataset root: {root}/{event}/{rumours|non-rumours}/{thread_id}/
        #[arg(env = "CASCADE_THREADS_ROOT", default_value = ".")]
        root: PathBuf,
        /// Label a thread risky at this many reactions within 60 minutes
        #[arg(long, default_value_t = RiskThresholds::default().reactions_60min)]
        min_reactions_60min: usize,
        /// ...or at this cascade depth
        #[arg(long, default_value_t = RiskThresholds::default().cascade_depth)]
        min_depth: usize,
    },
    /// Actor-behaviour dataset → users.json
    Users {
        /// Dataset root: {root}/{event}/{thread_id}/*.json
        #[arg(env = "CASCADE_USERS_ROOT", default_value = ".")]
        root: PathBuf,
    },
    /// Left-join threads.json with users.json → dataset.json
    Merge,
    /// Features of one live thread dump, printed to stdout
    Live {
        /// JSON file: {"id", "created_utc", "comments": [...]}
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();
    let out = cli.output_dir.as_path();

    match cli.command {
        Command::Threads {
            root,
            min_reactions_60min,
            min_depth,
        } => {
            let thresholds = RiskThresholds {
                reactions_60min: min_reactions_60min,
                cascade_depth: min_depth,
            };
            run_threads(&root, &thresholds, out)
        }
        Command::Users { root } => run_users(&root, out),
        Command::Merge => run_merge(out),
        Command::Live { file } => run_live(&file),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT FILE HELPERS
// ═══════════════════════════════════════════════════════════════════════

const THREADS_FILE: &str = "threads.json";
const USERS_FILE: &str = "users.json";
const DATASET_FILE: &str = "dataset.json";

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, data: &T) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&path, &json).with_context(|| format!("cannot write {}", path.display()))?;
    info!("wrote {} ({} bytes)", path.display(), json.len());
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    let json = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "cannot read {}; run the `threads` and `users` phases first",
            path.display()
        )
    })?;
    serde_json::from_str(&json).with_context(|| format!("cannot parse {}", path.display()))
}

fn require_dir(root: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("dataset root {} is not a directory", root.display());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  PHASES
// ═══════════════════════════════════════════════════════════════════════

fn run_threads(root: &Path, thresholds: &RiskThresholds, out: &Path) -> Result<()> {
    require_dir(root)?;
    let report = pipeline::extract_threads(root, thresholds);
    write_json(out, THREADS_FILE, &report.rows)
}

fn run_users(root: &Path, out: &Path) -> Result<()> {
    require_dir(root)?;
    let rows = pipeline::extract_users(root);
    write_json(out, USERS_FILE, &rows)
}

fn run_merge(out: &Path) -> Result<()> {
    let threads: Vec<ThreadRow> = read_json(out, THREADS_FILE)?;
    let users: Vec<UserRow> = read_json(out, USERS_FILE)?;
    info!("thread rows: {}, user rows: {}", threads.len(), users.len());

    let merged: Vec<DatasetRow> = features::merge(threads, &users);
    let with_behavior = merged
        .iter()
        .filter(|r| r.behavior != UserBehavior::default())
        .count();
    info!(
        "merged {} rows ({} with user behaviour)",
        merged.len(),
        with_behavior
    );
    write_json(out, DATASET_FILE, &merged)
}

fn run_live(file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let thread: live::LiveThread =
        serde_json::from_str(&json).with_context(|| format!("cannot parse {}", file.display()))?;
    let features = thread
        .features()
        .with_context(|| format!("thread {} has no usable creation time", thread.id))?;

    #[derive(serde::Serialize)]
    struct LiveResult<'a> {
        thread_id: &'a str,
        features: cascade_types::FeatureRecord,
        columns: [&'static str; 9],
        model_input: [f64; 9],
    }

    let result = LiveResult {
        thread_id: &thread.id,
        features,
        columns: FEATURE_COLUMNS,
        model_input: features.model_input(),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
