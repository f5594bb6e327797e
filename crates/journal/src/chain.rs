//! Reverse-delta version chain
//!
//! `current` holds the newest text verbatim. When a new version is committed the old
//! `current` is archived with its text replaced by `encode(new_text, old_text)`, so
//! walking from `current` toward the root always decodes from a text we already have
//! to the next older one.

use crate::record::{IntegrityReport, VersionEntry, VersionInfo, VersionRecord};
use rcs_core::{delta, RcsError, Result, VersionId};

impl VersionRecord {
    /// Advance the chain with a new verbatim `text`
    ///
    /// The record is only modified once every fallible step has succeeded.
    pub fn commit(&mut self, text: &str, comment: &str, time: f64) -> Result<VersionId> {
        let version = VersionId::identify(text, self.commit_count());
        if version == self.current.version || self.history.contains_key(&version) {
            return Err(RcsError::DeltaFailure(format!(
                "version {} is already on the chain",
                version
            )));
        }

        let archived = if self.has_commits() {
            let reverse = delta::encode(text, &self.current.data);
            let restored = delta::decode(text, &reverse).map_err(RcsError::into_delta_failure)?;
            if restored != self.current.data {
                return Err(RcsError::DeltaFailure(format!(
                    "reverse delta does not reproduce {}",
                    self.current.version
                )));
            }
            Some(reverse)
        } else {
            None
        };

        let parent = self.current.version.clone();
        let previous = std::mem::replace(
            &mut self.current,
            VersionEntry {
                version: version.clone(),
                time,
                comment: comment.to_string(),
                data: text.to_string(),
                parent,
            },
        );

        // The synthesized empty version is never archived; the root stays a bare sentinel
        if let Some(reverse) = archived {
            self.history.insert(
                previous.version.clone(),
                VersionEntry {
                    data: reverse,
                    ..previous
                },
            );
        }

        Ok(version)
    }

    /// Number of real commits, the root sentinel excluded
    pub fn commit_count(&self) -> usize {
        self.history.len() + usize::from(self.has_commits())
    }

    /// Entries from `current` back to the oldest commit, following parent links
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            record: self,
            next: self.has_commits().then_some(&self.current),
            remaining: self.history.len() + 1,
        }
    }

    /// Metadata for `current` followed by every ancestor, newest first
    pub fn versions(&self) -> Vec<VersionInfo> {
        self.chain().map(VersionEntry::info).collect()
    }

    /// Reconstruct the verbatim text of `target`
    pub fn reconstruct(&self, target: &str) -> Result<String> {
        let mut text = self.current.data.clone();
        let mut cursor = &self.current;

        while self.has_commits() {
            if cursor.version == *target {
                return Ok(text);
            }
            if cursor.parent.is_root() {
                break;
            }
            let Some(next) = self.history.get(&cursor.parent) else {
                break;
            };
            text = delta::decode(&text, &next.data).map_err(RcsError::into_delta_failure)?;
            cursor = next;
        }

        Err(RcsError::UnknownVersion(target.to_string()))
    }

    /// Reconstruct every version and check it against its content hash
    ///
    /// Extends a structural report with `content_mismatches` and `undecodable`.
    pub fn verify_contents(&self, report: &mut IntegrityReport) {
        if !self.has_commits() {
            return;
        }

        let mut text = self.current.data.clone();
        let mut entries = self.chain();
        // current was hash-checked by the structural pass
        entries.next();

        for entry in entries {
            match delta::decode(&text, &entry.data) {
                Ok(older) => {
                    if !entry.version.matches_content(&older) {
                        report.content_mismatches.push(entry.version.clone());
                    }
                    text = older;
                }
                Err(e) => {
                    tracing::warn!(version = %entry.version, "cannot apply delta: {}", e);
                    report.undecodable.push(entry.version.clone());
                    break;
                }
            }
        }
    }
}

/// Iterator over a record's chain, newest first
pub struct Chain<'a> {
    record: &'a VersionRecord,
    next: Option<&'a VersionEntry>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a VersionEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.next.take()?;
        self.remaining -= 1;
        if !entry.parent.is_root() {
            self.next = self.record.history.get(&entry.parent);
        }
        Some(entry)
    }
}
