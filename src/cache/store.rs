//! On-disk cache store: one JSON record per fingerprint.

use super::key::Fingerprint;
use crate::types::UserPrompt;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

const RECORD_EXTENSION: &str = "json";

/// A materialized batch of completions.
///
/// `prompts` repeats the user prompt once per requested completion;
/// `completions` holds one inner list per attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub prompts: Vec<UserPrompt>,
    pub completions: Vec<Vec<String>>,
}

impl CacheEntry {
    pub fn new(prompt: &UserPrompt, completions: Vec<Vec<String>>) -> Self {
        Self {
            prompts: vec![prompt.clone(); completions.len()],
            completions,
        }
    }

    pub fn len(&self) -> usize {
        self.completions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Split into `(prompts, completions)`.
    pub fn into_parts(self) -> (Vec<UserPrompt>, Vec<Vec<String>>) {
        (self.prompts, self.completions)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub corrupt: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    corrupt: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            corrupt: self.corrupt.load(Ordering::Relaxed),
        }
    }
}

/// Persists [`CacheEntry`] records under a root directory.
///
/// Records are written to a temp file in the same directory and renamed into
/// place, so a reader sees either the previous record or the new one, never
/// a partial write. Entries are never evicted.
pub struct CacheStore {
    root: PathBuf,
    stats: AtomicStats,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stats: AtomicStats::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root
            .join(format!("{}.{}", fingerprint.as_str(), RECORD_EXTENSION))
    }

    /// Load the record for `fingerprint`.
    ///
    /// A missing record is `Ok(None)`. A record that exists but does not parse,
    /// or whose prompt and completion counts disagree, is an error.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>> {
        let path = self.path_for(fingerprint);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %fingerprint, "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => return Err(self.corrupt(path, e.to_string())),
        };
        if entry.prompts.len() != entry.completions.len() {
            let reason = format!(
                "{} prompts but {} completions",
                entry.prompts.len(),
                entry.completions.len()
            );
            return Err(self.corrupt(path, reason));
        }

        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        info!(path = %path.display(), "loaded cached completions");
        Ok(Some(entry))
    }

    /// Write `entry` at `fingerprint`, replacing any existing record.
    pub fn store(&self, fingerprint: &Fingerprint, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let final_path = self.path_for(fingerprint);
        let data = serde_json::to_vec(entry)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".pending-")
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        temp.write_all(&data)?;
        temp.as_file().sync_all()?;
        temp.persist(&final_path).map_err(|e| Error::Io(e.error))?;

        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        info!(path = %final_path.display(), completions = entry.len(), "stored completions");
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    fn corrupt(&self, path: PathBuf, reason: String) -> Error {
        self.stats.corrupt.fetch_add(1, Ordering::Relaxed);
        Error::CacheCorrupted { path, reason }
    }
}
