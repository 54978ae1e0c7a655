//! Recorded-response gateway
//!
//! Replays completions saved on disk instead of calling a provider, so a
//! consensus can be recomputed (or tested) without network access.
//!
//! # Directory layout
//!
//! Files are sorted by name; each primary file fills the next temperature
//! slot. A file named `<stem>.retryN.<ext>` is the N-th retry for the
//! primary file with the same `<stem>`:
//!
//! ```text
//! responses/
//!   01.md          slot 0
//!   02.md          slot 1
//!   02.retry1.md   slot 1, first retry
//!   03.md          slot 2
//! ```

use async_trait::async_trait;
use consensus_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

static RETRY_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>.+)\.retry(?P<attempt>\d+)$").expect("invalid retry stem regex")
});

/// Errors while loading recorded responses
#[derive(Error, Debug)]
pub enum RecordedResponseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No response files found in {0}")]
    Empty(PathBuf),
}

/// Gateway answering from pre-recorded completions
#[derive(Debug, Clone, Default)]
pub struct RecordedResponseGateway {
    /// `slots[slot][attempt]`
    slots: Vec<Vec<Option<String>>>,
}

impl RecordedResponseGateway {
    /// Gateway with one completion per slot and no retries
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            slots: responses.into_iter().map(|r| vec![Some(r)]).collect(),
        }
    }

    /// Add the completion returned for `attempt` of `slot`
    pub fn with_retry(mut self, slot: usize, attempt: usize, response: impl Into<String>) -> Self {
        if let Some(attempts) = self.slots.get_mut(slot) {
            if attempts.len() <= attempt {
                attempts.resize(attempt + 1, None);
            }
            attempts[attempt] = Some(response.into());
        }
        self
    }

    /// Load every file of `dir` (hidden files skipped)
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RecordedResponseError> {
        let dir = dir.as_ref();
        let io_error = |source| RecordedResponseError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && !is_hidden(path))
            .collect();
        files.sort();

        // Primary files keep directory order; retries are keyed by their base stem
        let mut primaries: Vec<(String, PathBuf)> = Vec::new();
        let mut retries: BTreeMap<String, Vec<(usize, PathBuf)>> = BTreeMap::new();

        for path in files {
            let stem = file_stem(&path);
            match RETRY_STEM.captures(&stem) {
                Some(caps) => {
                    let attempt = caps["attempt"].parse().unwrap_or(0);
                    if attempt == 0 {
                        warn!("Ignoring retry file with attempt 0: {}", path.display());
                        continue;
                    }
                    retries
                        .entry(caps["base"].to_string())
                        .or_default()
                        .push((attempt, path));
                }
                None => primaries.push((stem, path)),
            }
        }

        if primaries.is_empty() {
            return Err(RecordedResponseError::Empty(dir.to_path_buf()));
        }

        let mut gateway = Self::new(Vec::new());
        for (slot, (stem, path)) in primaries.into_iter().enumerate() {
            gateway.slots.push(vec![Some(read(&path)?)]);
            for (attempt, retry_path) in retries.remove(&stem).unwrap_or_default() {
                gateway = gateway.with_retry(slot, attempt, read(&retry_path)?);
            }
        }

        for (stem, orphans) in retries {
            for (_, path) in orphans {
                warn!(
                    "Ignoring retry file without primary '{}': {}",
                    stem,
                    path.display()
                );
            }
        }

        debug!(
            "Loaded {} recorded responses from {}",
            gateway.slot_count(),
            dir.display()
        );
        Ok(gateway)
    }

    /// Number of temperature slots with a recorded completion
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[async_trait]
impl LlmGateway for RecordedResponseGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        self.slots
            .get(request.slot)
            .and_then(|attempts| attempts.get(request.attempt))
            .and_then(Clone::clone)
            .ok_or(GatewayError::NoRecordedResponse {
                slot: request.slot,
                attempt: request.attempt,
            })
    }
}

fn read(path: &Path) -> Result<String, RecordedResponseError> {
    std::fs::read_to_string(path).map_err(|source| RecordedResponseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
