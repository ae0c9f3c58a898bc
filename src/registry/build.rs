//! Offline registry maintenance.
//!
//! The tour calendar is downloaded to `tournaments_calendar_raw_<YYYYMMDD>.json`
//! in the data directory, then folded into `tournament_registry.json`. The
//! merge only ever appends: tournaments already in the registry are kept as
//! they are, so the registry accumulates ids across seasons.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::REGISTRY_FILE_NAME;
use crate::models::TournamentRecord;
use crate::normalize::scalar_string;

const RAW_CALENDAR_PREFIX: &str = "tournaments_calendar_raw_";

/// Errors that can occur while rebuilding the registry.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Registry {0} is not a JSON array")]
    NotAnArray(PathBuf),
}

/// Outcome of a registry rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub source: PathBuf,
    pub added: usize,
    pub total: usize,
}

/// File name for a calendar snapshot taken on `date`.
pub fn calendar_file_name(date: NaiveDate) -> String {
    format!("{}{}.json", RAW_CALENDAR_PREFIX, date.format("%Y%m%d"))
}

/// Write a downloaded calendar into the data directory.
pub fn save_calendar(data_dir: &Path, calendar: &Value, date: NaiveDate) -> Result<PathBuf, BuildError> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(calendar_file_name(date));
    let json = serde_json::to_string_pretty(calendar).map_err(|source| BuildError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Most recent calendar snapshot, by file name.
pub fn latest_raw_calendar(data_dir: &Path) -> Result<Option<PathBuf>, BuildError> {
    let pattern = data_dir.join(format!("{}*.json", RAW_CALENDAR_PREFIX));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .collect();
    files.sort();
    Ok(files.pop())
}

/// Pull one registry entry per tournament out of a calendar payload
/// (`TournamentDates[].Tournaments[]`). Tournaments without an `Id` are skipped.
pub fn extract_entries(calendar: &Value) -> Vec<TournamentRecord> {
    let Some(blocks) = calendar.get("TournamentDates").and_then(Value::as_array) else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter_map(|block| block.get("Tournaments").and_then(Value::as_array))
        .flatten()
        .filter_map(TournamentRecord::from_value)
        .collect()
}

/// Append entries whose id is not yet present. Returns the number added.
pub fn merge_entries(existing: &mut Vec<Value>, entries: Vec<TournamentRecord>) -> usize {
    let mut known: HashSet<String> = existing
        .iter()
        .filter_map(|t| t.get("Id").and_then(scalar_string))
        .collect();

    let mut added = 0;
    for entry in entries {
        if known.insert(entry.id.clone()) {
            // TournamentRecord only holds strings and integers
            if let Ok(value) = serde_json::to_value(&entry) {
                existing.push(value);
                added += 1;
            }
        }
    }
    added
}

/// Fold the latest calendar snapshot into the registry file.
///
/// Returns `None` when no snapshot exists in `data_dir`.
pub fn build_registry(data_dir: &Path) -> Result<Option<BuildSummary>, BuildError> {
    let Some(source) = latest_raw_calendar(data_dir)? else {
        return Ok(None);
    };
    info!("Using raw calendar {}", source.display());

    let calendar = read_json(&source)?;
    let entries = extract_entries(&calendar);

    let registry_path = data_dir.join(REGISTRY_FILE_NAME);
    let mut existing = if registry_path.exists() {
        match read_json(&registry_path)? {
            Value::Array(items) => items,
            _ => return Err(BuildError::NotAnArray(registry_path)),
        }
    } else {
        Vec::new()
    };

    let added = merge_entries(&mut existing, entries);
    let total = existing.len();

    let json = serde_json::to_string_pretty(&existing).map_err(|source| BuildError::Json {
        path: registry_path.clone(),
        source,
    })?;
    std::fs::write(&registry_path, json)?;

    info!("Registry updated: {} added, {} total", added, total);
    Ok(Some(BuildSummary {
        source,
        added,
        total,
    }))
}

fn read_json(path: &Path) -> Result<Value, BuildError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| BuildError::Json {
        path: path.to_path_buf(),
        source,
    })
}
