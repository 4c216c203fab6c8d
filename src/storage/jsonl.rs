//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for match records and standings.
//! Each line is a valid JSON object representing one entity.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::models::{AnalyzedMatch, Match, StandingsRow};

use super::{StorageConfig, StorageError};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Match,
    Standings,
    Insights,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Match => "matches.jsonl",
            EntityType::Standings => "standings.jsonl",
            EntityType::Insights => "insights.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a specific entity type.
    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. Malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Create an iterator over the file.
    pub fn iter(&self) -> Result<JsonlIterator<T>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        Ok(JsonlIterator {
            reader: BufReader::new(file),
            _marker: PhantomData,
        })
    }
}

/// Iterator over JSONL file entries.
pub struct JsonlIterator<T> {
    reader: BufReader<File>,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> Iterator for JsonlIterator<T> {
    type Item = Result<T, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(&line).map_err(StorageError::Json));
                }
                Err(e) => return Some(Err(StorageError::Io(e))),
            }
        }
    }
}

/// Read every match record.
pub fn read_matches(config: &StorageConfig) -> Result<Vec<Match>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Match).read_all()
}

/// Read the standings table; empty when absent.
pub fn read_standings(config: &StorageConfig) -> Result<Vec<StandingsRow>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Standings).read_all()
}

/// Stream the match file until the record with `id` is found.
///
/// Malformed lines are skipped; a missing file yields `None`.
pub fn find_match(config: &StorageConfig, id: &str) -> Result<Option<Match>, StorageError> {
    let reader: JsonlReader<Match> = JsonlReader::for_entity(config, EntityType::Match);
    if !reader.exists() {
        return Ok(None);
    }

    for item in reader.iter()? {
        match item {
            Ok(m) if m.id == id => return Ok(Some(m)),
            Ok(_) => {}
            Err(StorageError::Json(e)) => warn!("Skipping malformed match record: {}", e),
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Replace the derived insight snapshot.
pub fn write_insights(
    config: &StorageConfig,
    analyzed: &[AnalyzedMatch],
) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Insights).write_all(analyzed)
}

/// Read the derived insight snapshot.
pub fn read_insights(config: &StorageConfig) -> Result<Vec<AnalyzedMatch>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Insights).read_all()
}
