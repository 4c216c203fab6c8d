//! Filesystem data directory operations.
//!
//! Handles reading and writing the local data directory:
//! - Canonical match records (`matches.jsonl`)
//! - The standings table (`standings.jsonl`)
//! - Derived insight snapshots (`derived/insights.jsonl`)

pub mod jsonl;

use std::path::PathBuf;
use thiserror::Error;

use crate::insights::analyze_matches;
use crate::models::AnalyzedMatch;

pub use jsonl::{
    find_match, read_insights, read_matches, read_standings, write_insights, EntityType,
    JsonlReader, JsonlWriter,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Match.filename())
    }

    pub fn standings_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Standings.filename())
    }

    pub fn derived_dir(&self) -> PathBuf {
        self.data_dir.join("derived")
    }

    pub fn insights_path(&self) -> PathBuf {
        self.derived_dir().join(EntityType::Insights.filename())
    }

    /// Path of the file holding `entity`.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        match entity {
            EntityType::Match => self.matches_path(),
            EntityType::Standings => self.standings_path(),
            EntityType::Insights => self.insights_path(),
        }
    }

    /// Check that the data directory is usable.
    pub fn validate(&self) -> Result<(), StorageError> {
        if !self.data_dir.exists() {
            return Err(StorageError::PathNotFound(self.data_dir.clone()));
        }
        if !self.data_dir.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{} is not a directory",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Load every match with its insights computed against the stored standings.
pub fn load_analyzed_matches(config: &StorageConfig) -> Result<Vec<AnalyzedMatch>, StorageError> {
    let matches = read_matches(config)?;
    let standings = read_standings(config)?;
    Ok(analyze_matches(matches, &standings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.matches_path(), PathBuf::from("/data/matches.jsonl"));
        assert_eq!(config.standings_path(), PathBuf::from("/data/standings.jsonl"));
        assert_eq!(config.derived_dir(), PathBuf::from("/data/derived"));
        assert_eq!(
            config.insights_path(),
            PathBuf::from("/data/derived/insights.jsonl")
        );
        assert_eq!(config.entity_path(EntityType::Match), config.matches_path());
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_validate_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(StorageConfig::new(temp_dir.path().to_path_buf())
            .validate()
            .is_ok());

        let missing = StorageConfig::new(temp_dir.path().join("missing"));
        assert!(matches!(
            missing.validate(),
            Err(StorageError::PathNotFound(_))
        ));

        let file = temp_dir.path().join("file");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            StorageConfig::new(file).validate(),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_load_analyzed_matches() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        std::fs::write(
            config.matches_path(),
            concat!(
                r#"{"id":"1","status":"completed","teams":{"home":{"id":"H","name":"Home"},"away":{"id":"A","name":"Away"}},"score":{"home":{"runs":150,"wickets":8,"overs":20},"away":{"runs":151,"wickets":3,"overs":18.2}},"result":{"winner":"A","margin":"7 wickets"}}"#,
                "\n",
                r#"{"id":"2","status":"upcoming","teams":{"home":{"id":"H"},"away":{"id":"A"}}}"#,
                "\n",
            ),
        )
        .unwrap();

        let analyzed = load_analyzed_matches(&config).unwrap();
        assert_eq!(analyzed.len(), 2);
        assert!(analyzed[0].insights.is_some());
        assert!(analyzed[1].insights.is_none());
    }
}
