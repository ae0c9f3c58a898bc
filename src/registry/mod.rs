//! Local tournament registry.
//!
//! The registry is a JSON array of tournaments kept on disk (built offline
//! from the tour calendar, see [`build`]). It is read once on first use and
//! held for the lifetime of the process.

pub mod build;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::models::TournamentRecord;

/// Errors that can occur while reading the registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Missing data file: {0}")]
    Missing(String),

    #[error("Invalid JSON in: {0}")]
    InvalidJson(String),

    #[error("Registry {0} is not a JSON array")]
    NotAnArray(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory lookup table of tournaments keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<TournamentRecord>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    /// Build from raw registry elements. Elements without an `Id` are skipped;
    /// a repeated `Id` replaces the earlier record in place.
    pub fn from_values(items: &[Value]) -> Self {
        let mut registry = Self::default();
        for record in items.iter().filter_map(TournamentRecord::from_value) {
            registry.insert(record);
        }
        registry
    }

    fn insert(&mut self, record: TournamentRecord) {
        let existing = self.by_id.get(&record.id).copied();
        match existing {
            Some(idx) => self.records[idx] = record,
            None => {
                self.by_id.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TournamentRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a user-supplied tournament reference to a canonical identifier.
    ///
    /// Tried in order: exact identifier, case-insensitive display name (first
    /// match in file order), then any all-digit input verbatim. The registry is
    /// only a partial copy of the upstream catalog, so unknown numeric ids are
    /// passed through rather than rejected.
    pub fn resolve(&self, input: &str) -> Option<String> {
        if self.by_id.contains_key(input) {
            return Some(input.to_string());
        }

        let lowered = input.to_lowercase();
        if let Some(record) = self.records.iter().find(|r| r.name_matches(&lowered)) {
            return Some(record.id.clone());
        }

        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            return Some(input.to_string());
        }

        None
    }
}

/// Lazily loads and caches the registry file.
///
/// A failed load is not cached; the next call retries the read.
#[derive(Debug)]
pub struct RegistryLoader {
    path: PathBuf,
    cache: OnceCell<Arc<Registry>>,
}

impl RegistryLoader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the registry, reading the file on first call only.
    pub async fn load(&self) -> Result<Arc<Registry>, RegistryError> {
        self.cache
            .get_or_try_init(|| async {
                let items = read_registry_array(&self.path).await?;
                let registry = Registry::from_values(&items);
                info!(
                    "Loaded {} tournaments from {}",
                    registry.len(),
                    self.path.display()
                );
                Ok::<_, RegistryError>(Arc::new(registry))
            })
            .await
            .cloned()
    }

    /// Read the registry file as-is, bypassing the cache.
    pub async fn read_raw(&self) -> Result<Value, RegistryError> {
        read_registry_json(&self.path).await
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_registry_json(path: &Path) -> Result<Value, RegistryError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RegistryError::Missing(file_name(path)));
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&contents).map_err(|_| RegistryError::InvalidJson(file_name(path)))
}

async fn read_registry_array(path: &Path) -> Result<Vec<Value>, RegistryError> {
    match read_registry_json(path).await? {
        Value::Array(items) => Ok(items),
        _ => Err(RegistryError::NotAnArray(file_name(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doha_registry() -> Registry {
        Registry::from_values(&[
            json!({"Id": "580", "Name": "Doha"}),
            json!({"Id": "375", "Name": "Montpellier", "SglDrawSize": 28}),
        ])
    }

    #[test]
    fn test_resolve_exact_id() {
        assert_eq!(doha_registry().resolve("580"), Some("580".to_string()));
    }

    #[test]
    fn test_resolve_name_case_insensitive() {
        let registry = doha_registry();
        assert_eq!(registry.resolve("doha"), Some("580".to_string()));
        assert_eq!(registry.resolve("DOHA"), Some("580".to_string()));
    }

    #[test]
    fn test_resolve_unknown_numeric_passthrough() {
        assert_eq!(doha_registry().resolve("9999"), Some("9999".to_string()));
    }

    #[test]
    fn test_resolve_not_found() {
        let registry = doha_registry();
        assert_eq!(registry.resolve("not-a-thing"), None);
        assert_eq!(registry.resolve(""), None);
        assert_eq!(registry.resolve("12a"), None);
    }

    #[test]
    fn test_resolve_first_name_match_wins() {
        let registry = Registry::from_values(&[
            json!({"Id": "1", "Name": "Open"}),
            json!({"Id": "2", "Name": "OPEN"}),
        ]);
        assert_eq!(registry.resolve("open"), Some("1".to_string()));
    }

    #[test]
    fn test_from_values_skips_records_without_id() {
        let registry = Registry::from_values(&[
            json!({"Name": "No Id"}),
            json!({"Id": "580", "Name": "Doha"}),
            json!(42),
        ]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("580").is_some());
    }

    #[test]
    fn test_from_values_duplicate_id_replaces() {
        let registry = Registry::from_values(&[
            json!({"Id": "580", "Name": "Doha"}),
            json!({"Id": "580", "Name": "Qatar Open"}),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("580").and_then(|r| r.name.as_deref()),
            Some("Qatar Open")
        );
    }

    #[tokio::test]
    async fn test_loader_reads_and_caches() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tournament_registry.json");
        std::fs::write(
            &path,
            r#"[{"Id": "580", "Name": "Doha", "SglDrawSize": 32}, {"Name": "orphan"}]"#,
        )
        .unwrap();

        let loader = RegistryLoader::new(path.clone());
        let first = loader.load().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.get("580").unwrap().sgl_draw_size, Some(32));

        // cached for the process lifetime, even if the file goes away
        std::fs::remove_file(&path).unwrap();
        let second = loader.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_loader_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = RegistryLoader::new(tmp.path().join("tournament_registry.json"));

        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, RegistryError::Missing(_)));
        assert_eq!(
            err.to_string(),
            "Missing data file: tournament_registry.json"
        );
    }

    #[tokio::test]
    async fn test_loader_invalid_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tournament_registry.json");
        std::fs::write(&path, "[{not json").unwrap();

        let err = RegistryLoader::new(path).load().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON in: tournament_registry.json");
    }

    #[tokio::test]
    async fn test_loader_not_an_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tournament_registry.json");
        std::fs::write(&path, r#"{"Id": "580"}"#).unwrap();

        let err = RegistryLoader::new(path).load().await.unwrap_err();
        assert!(matches!(err, RegistryError::NotAnArray(_)));
    }

    #[tokio::test]
    async fn test_loader_failure_is_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tournament_registry.json");
        let loader = RegistryLoader::new(path.clone());

        assert!(loader.load().await.is_err());

        std::fs::write(&path, r#"[{"Id": "580"}]"#).unwrap();
        assert_eq!(loader.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_raw_returns_file_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tournament_registry.json");
        std::fs::write(&path, r#"[{"Id": "580", "Extra": true}]"#).unwrap();

        let raw = RegistryLoader::new(path).read_raw().await.unwrap();
        assert_eq!(raw, json!([{"Id": "580", "Extra": true}]));
    }
}
