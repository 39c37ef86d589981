//! SyncState - read-only view of the pve-zsync state file

use crate::models::{Job, JobRecord, LastSync};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::staleness::calculate_lag;

/// Jobs keyed by source, then by job name
type SourceMap = IndexMap<String, IndexMap<String, JobRecord>>;

/// Errors that can occur while reading the state file or its timestamps
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to read state file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse state file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid lsync timestamp '{value}' for job '{job}' (expected YYYY-MM-DD_HH:MM:SS)")]
    InvalidTimestamp {
        job: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Replication jobs loaded from a state file
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    sources: SourceMap,
}

impl SyncState {
    /// Load the state file at `path`
    ///
    /// An empty object is a valid state with no jobs. A missing or
    /// malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let state = Self::parse(&content).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            sources = state.sources.len(),
            jobs = state.len(),
            "loaded sync state"
        );
        Ok(state)
    }

    /// Parse state file content
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let sources: SourceMap = serde_json::from_str(content)?;
        Ok(Self { sources })
    }

    /// All jobs, source by source, in file order
    pub fn jobs(&self) -> impl Iterator<Item = Job<'_>> {
        self.sources.iter().flat_map(|(source, jobs)| {
            jobs.iter().map(move |(name, record)| Job {
                source,
                name,
                record,
            })
        })
    }

    /// Job names in file order (may repeat across sources)
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs().map(|job| job.name).collect()
    }

    /// Source identifiers in file order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Look up a job by source and name
    pub fn get(&self, source: &str, name: &str) -> Option<&JobRecord> {
        self.sources.get(source)?.get(name)
    }

    /// Total number of jobs across all sources
    pub fn len(&self) -> usize {
        self.sources.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Job<'_> {
    /// Seconds between the job's last sync and `now`
    pub fn lag(&self, now: NaiveDateTime) -> Result<i64, StateError> {
        calculate_lag(&self.record.last_sync, now).map_err(|source| {
            StateError::InvalidTimestamp {
                job: self.name.to_string(),
                value: match &self.record.last_sync {
                    LastSync::At(value) => value.clone(),
                    LastSync::Never => String::new(),
                },
                source,
            }
        })
    }
}
