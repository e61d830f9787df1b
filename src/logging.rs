// src/logging.rs
use anyhow::{Context, Result};
use chrono::Local;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log files from earlier runs kept next to the current one.
const KEPT_RUNS: usize = 10;
const FILE_PREFIX: &str = "lazyleaf_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

struct RunLog {
    file: File,
    threshold: LogLevel,
}

lazy_static! {
    static ref RUN_LOG: Mutex<Option<RunLog>> = Mutex::new(None);
}

pub fn log_dir() -> PathBuf {
    crate::config::Config::config_dir().join("logs")
}

/// Opens this run's log file under [`log_dir`]. Until this is called every
/// log call is a no-op, which keeps tests quiet.
pub fn init_logger(threshold: LogLevel) -> Result<PathBuf> {
    let path = open_run_log(&log_dir())?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context("Failed to create log file")?;

    let mut guard = RUN_LOG
        .lock()
        .map_err(|_| anyhow::anyhow!("Failed to lock log file mutex"))?;
    *guard = Some(RunLog { file, threshold });
    Ok(path)
}

/// Prepares `dir` for a new run and returns the path of its log file.
fn open_run_log(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).context("Failed to create log directory")?;
    if let Err(err) = prune_old_logs(dir, KEPT_RUNS) {
        eprintln!("Failed to prune old logs: {}", err);
    }
    let timestamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
    Ok(dir.join(format!("{}{}.log", FILE_PREFIX, timestamp)))
}

/// Deletes all but the newest `keep` run logs. Names sort by timestamp.
fn prune_old_logs(dir: &Path, keep: usize) -> std::io::Result<usize> {
    let mut logs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(".log"))
        })
        .collect();
    logs.sort();

    let excess = logs.len().saturating_sub(keep);
    for path in &logs[..excess] {
        std::fs::remove_file(path)?;
    }
    Ok(excess)
}

fn format_entry(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] {:<5} {}\n", timestamp, level.as_str(), message)
}

pub fn log(level: LogLevel, message: &str) {
    let Ok(mut guard) = RUN_LOG.lock() else {
        eprintln!("Failed to lock log file mutex");
        return;
    };
    let Some(run_log) = guard.as_mut() else { return };
    if level < run_log.threshold {
        return;
    }

    let entry = format_entry(level, message);
    if let Err(e) = run_log
        .file
        .write_all(entry.as_bytes())
        .and_then(|_| run_log.file.flush())
    {
        eprintln!("Failed to write to log file: {}", e);
    }
}

pub fn debug(message: &str) {
    log(LogLevel::Debug, message)
}

pub fn info(message: &str) {
    log(LogLevel::Info, message)
}

pub fn warn(message: &str) {
    log(LogLevel::Warn, message)
}

pub fn error(message: &str) {
    log(LogLevel::Error, message)
}

/// Logs an error the reader can carry on from.
pub fn handle_non_critical_error(err: &anyhow::Error) {
    error(&format!("{:#}", err));
}
