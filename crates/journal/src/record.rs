//! Versioned-file record and its JSON persistence
//!
//! One record per logical file:
//! ```text
//! {
//!   "current": { "version", "time", "comment", "data", "parent" },
//!   "history": { "<version>": { ...same shape, data is a reverse delta... } }
//! }
//! ```
//! `current.data` is verbatim text. Every `history` entry's `data` is the delta that
//! turns the text of the version that superseded it back into its own text.

use rcs_core::{stage_write, RcsError, Result, StagedWrite, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// One version slot, either `current` or an archived `history` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: VersionId,
    /// Seconds since the Unix epoch, millisecond precision
    pub time: f64,
    pub comment: String,
    /// Verbatim text in `current`, reverse delta in `history`
    pub data: String,
    pub parent: VersionId,
}

impl VersionEntry {
    pub fn info(&self) -> VersionInfo {
        VersionInfo {
            version: self.version.clone(),
            time: self.time,
            comment: self.comment.clone(),
            parent: self.parent.clone(),
        }
    }
}

/// Version metadata, without text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: VersionId,
    pub time: f64,
    pub comment: String,
    pub parent: VersionId,
}

impl VersionInfo {
    /// Commit time in Unix milliseconds
    pub fn timestamp_ms(&self) -> u64 {
        (self.time * 1000.0).round() as u64
    }
}

/// Full persisted state of one versioned file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub current: VersionEntry,
    #[serde(default)]
    pub history: BTreeMap<VersionId, VersionEntry>,
}

impl VersionRecord {
    /// Record of a file with no commits yet
    pub fn empty() -> Self {
        Self {
            current: VersionEntry {
                version: VersionId::root(),
                time: now_secs(),
                comment: String::new(),
                data: String::new(),
                parent: VersionId::root(),
            },
            history: BTreeMap::new(),
        }
    }

    /// Whether at least one version has been committed
    pub fn has_commits(&self) -> bool {
        !self.current.version.is_root()
    }

    /// Structural consistency of the chain
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        report.root_in_history = self.history.contains_key(&VersionId::root());
        report.current_in_history = self.history.contains_key(&self.current.version);

        if self.has_commits() && !self.current.version.matches_content(&self.current.data) {
            report
                .content_mismatches
                .push(self.current.version.clone());
        }

        let mut visited: HashSet<&VersionId> = HashSet::new();
        if self.has_commits() {
            let mut cursor = &self.current;
            visited.insert(&cursor.version);
            report.chain_len = 1;

            while !cursor.parent.is_root() {
                let Some(next) = self.history.get(&cursor.parent) else {
                    report.dangling_parents.push(cursor.parent.clone());
                    break;
                };
                if !visited.insert(&next.version) || next.version != cursor.parent {
                    report.cycle_at = Some(cursor.parent.clone());
                    break;
                }
                report.chain_len += 1;
                cursor = next;
            }
        }

        report.orphaned = self
            .history
            .keys()
            .filter(|id| !visited.contains(id))
            .cloned()
            .collect();

        report
    }
}

/// Findings of an integrity check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrityReport {
    /// Versions reachable from `current`, `current` included
    pub chain_len: usize,
    /// Parent references with no `history` entry
    pub dangling_parents: Vec<VersionId>,
    /// Chain revisits a version, or a history key disagrees with its entry
    pub cycle_at: Option<VersionId>,
    /// `history` entries not reachable from `current`
    pub orphaned: Vec<VersionId>,
    /// The root sentinel is stored as a `history` key
    pub root_in_history: bool,
    /// `current` is also archived in `history`
    pub current_in_history: bool,
    /// Versions whose text does not hash to their identifier
    pub content_mismatches: Vec<VersionId>,
    /// Versions whose reverse delta could not be applied
    pub undecodable: Vec<VersionId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_parents.is_empty()
            && self.cycle_at.is_none()
            && self.orphaned.is_empty()
            && !self.root_in_history
            && !self.current_in_history
            && self.content_mismatches.is_empty()
            && self.undecodable.is_empty()
    }

    /// One-line description of every problem found
    pub fn summary(&self) -> String {
        let mut problems = Vec::new();
        if !self.dangling_parents.is_empty() {
            problems.push(format!("dangling parent {}", join(&self.dangling_parents)));
        }
        if let Some(id) = &self.cycle_at {
            problems.push(format!("chain loops at {}", id));
        }
        if !self.orphaned.is_empty() {
            problems.push(format!("unreachable history {}", join(&self.orphaned)));
        }
        if self.root_in_history {
            problems.push("root sentinel stored in history".to_string());
        }
        if self.current_in_history {
            problems.push("current version duplicated in history".to_string());
        }
        if !self.content_mismatches.is_empty() {
            problems.push(format!("content hash mismatch {}", join(&self.content_mismatches)));
        }
        if !self.undecodable.is_empty() {
            problems.push(format!("undecodable delta {}", join(&self.undecodable)));
        }

        if problems.is_empty() {
            format!("ok ({} versions)", self.chain_len)
        } else {
            problems.join("; ")
        }
    }
}

fn join(ids: &[VersionId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

/// Read and parse the record at `path` without checking the chain
///
/// A missing file yields [`VersionRecord::empty`].
pub fn load_unchecked(path: &Path) -> Result<VersionRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no record on disk, starting empty");
            return Ok(VersionRecord::empty());
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(RcsError::corrupt(path, format!("not UTF-8: {}", e)));
        }
        Err(e) => return Err(RcsError::io(path, e)),
    };

    serde_json::from_str(&content).map_err(|e| RcsError::corrupt(path, e.to_string()))
}

/// Load the record at `path`, rejecting records that fail the integrity check
pub fn load(path: &Path) -> Result<VersionRecord> {
    let record = load_unchecked(path)?;

    let report = record.check_integrity();
    if !report.is_clean() {
        tracing::warn!(path = %path.display(), "integrity check failed: {}", report.summary());
        return Err(RcsError::corrupt(path, report.summary()));
    }

    tracing::debug!(
        path = %path.display(),
        versions = report.chain_len,
        "loaded record"
    );
    Ok(record)
}

/// Serialize `record` into a temp sibling of `path` without replacing it yet
pub fn stage(path: &Path, record: &VersionRecord) -> Result<StagedWrite> {
    let mut bytes = serde_json::to_vec_pretty(record)?;
    bytes.push(b'\n');
    stage_write(path, &bytes)
}

/// Atomically replace the record at `path`
pub fn save(path: &Path, record: &VersionRecord) -> Result<()> {
    stage(path, record)?.commit()
}

/// Current time as fractional Unix seconds (millisecond precision)
pub fn now_secs() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    ms as f64 / 1000.0
}
