//! Logging setup for the gigadeploy binary.
//!
//! Every run appends to `<home>/logs/<app>.log`. A deploy is short, so the
//! log is rotated once, when a run opens a file that has outgrown
//! [`MAX_LOG_BYTES`], rather than on every write.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "gigadeploy=info";
/// Rotated logs kept beside the active one.
const KEEP_ROTATED: usize = 4;
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

pub struct LogConfig<'a> {
    /// Log file stem
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of warnings only
    pub verbose: bool,
}

/// Install the tracing subscriber: a file layer under [`logs_dir`] and a
/// stderr layer.
///
/// If the log file cannot be opened, only the stderr layer is installed and
/// a warning is printed.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_file = ensure_logs_dir().and_then(|dir| {
        open_run_log(&dir, config.app_name, KEEP_ROTATED, MAX_LOG_BYTES)
            .with_context(|| format!("Failed to open log file in {}", dir.display()))
    });
    let log_file = match log_file {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: file logging disabled: {:#}", err);
            None
        }
    };

    build_subscriber(config.verbose, log_file)
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// The file layer is optional so both shapes share one subscriber type.
fn build_subscriber(
    verbose: bool,
    log_file: Option<File>,
) -> impl Subscriber + Send + Sync + 'static {
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = if verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(file_filter)
    });
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
}

/// gigadeploy state home: `GIGADEPLOY_HOME`, else `~/.gigadeploy`, else
/// `./.gigadeploy`.
pub fn gigadeploy_home() -> PathBuf {
    if let Some(home) = std::env::var_os("GIGADEPLOY_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gigadeploy")
}

pub fn logs_dir() -> PathBuf {
    gigadeploy_home().join("logs")
}

pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Open `<dir>/<stem>.log` for appending, rotating it first when it is larger
/// than `max_bytes`.
fn open_run_log(dir: &Path, app_name: &str, keep: usize, max_bytes: u64) -> io::Result<File> {
    let stem = log_stem(app_name);
    let active = dir.join(format!("{}.log", stem));

    let size = match fs::metadata(&active) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => 0,
        Err(err) => return Err(err),
    };
    if size > max_bytes {
        rotate(dir, &stem, keep)?;
    }

    OpenOptions::new().create(true).append(true).open(&active)
}

/// Shift `<stem>.log` to `.1`, `.1` to `.2` and so on; whatever would land
/// past `keep` is deleted. With `keep == 0` the active log is just removed.
fn rotate(dir: &Path, stem: &str, keep: usize) -> io::Result<()> {
    let numbered = |n: usize| dir.join(format!("{}.log.{}", stem, n));
    let active = dir.join(format!("{}.log", stem));

    if keep == 0 {
        return remove_if_present(&active);
    }

    remove_if_present(&numbered(keep))?;
    for n in (1..keep).rev() {
        let from = numbered(n);
        if from.exists() {
            fs::rename(&from, numbered(n + 1))?;
        }
    }
    fs::rename(&active, numbered(1))
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// File stem from an app name; anything outside `[A-Za-z0-9_-]` becomes `_`.
fn log_stem(app_name: &str) -> String {
    let stem: String = app_name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if stem.is_empty() {
        "gigadeploy".to_string()
    } else {
        stem
    }
}
