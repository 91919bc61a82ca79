//! Duplicate group management and ordering.
//!
//! A [`DuplicateGroup`] holds two or more files that a detection strategy
//! considers duplicates of each other. Groups own their ordering rules:
//! within a group the best file comes first (the one a user would keep),
//! and across groups the biggest space wins come first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::scanner::{Category, FileEntry};

use super::Strategy;

/// Size difference under which two files are considered the same size for
/// ordering purposes, so the fresher file ranks first.
const SIZE_EPSILON: u64 = 1024;

/// A confirmed duplicate group of files.
///
/// Invariant: a group holds at least two files. Mutation through
/// [`DuplicateGroup::remove_file`] can shrink it below that, in which case
/// the owning collection must drop the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Stable identifier within one detection run.
    pub id: usize,
    /// Grouping key: the hex content digest for [`Strategy::ContentHash`],
    /// otherwise the normalized base name (with the shared size appended
    /// for [`Strategy::NameAndSize`]).
    pub key: String,
    /// Strategy that produced this group.
    pub strategy: Strategy,
    /// Member files, ordered best-first.
    pub files: Vec<FileEntry>,
    /// Sum of all member sizes in bytes.
    pub total_size: u64,
}

impl DuplicateGroup {
    /// Create a group from its members. Computes `total_size` and applies
    /// the in-group ordering.
    #[must_use]
    pub fn new(id: usize, key: String, strategy: Strategy, mut files: Vec<FileEntry>) -> Self {
        sort_files(&mut files);
        let total_size = files.iter().map(|f| f.size).sum();
        Self {
            id,
            key,
            strategy,
            files,
            total_size,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bytes reclaimable by keeping only the smallest member.
    ///
    /// Computed as total size minus the smallest member, so it stays
    /// meaningful when member sizes differ.
    #[must_use]
    pub fn potential_savings(&self) -> u64 {
        let smallest = self.files.iter().map(|f| f.size).min().unwrap_or(0);
        self.total_size.saturating_sub(smallest)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Remove a file by path, keeping `total_size` consistent.
    ///
    /// Returns true if a file was removed. The caller is responsible for
    /// dropping the group once it falls below two members.
    pub fn remove_file(&mut self, path: &std::path::Path) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.path != path);
        if self.files.len() < before {
            self.total_size = self.files.iter().map(|f| f.size).sum();
            true
        } else {
            false
        }
    }

    /// Whether the group still qualifies as a duplicate group.
    #[must_use]
    pub fn is_viable(&self) -> bool {
        self.files.len() >= 2
    }
}

/// Quality rank for ordering files inside a group. Higher is better.
///
/// Only audio files carry a quality signal: lossless formats outrank lossy
/// ones, and among lossy files a higher declared bitrate wins. Everything
/// else ranks equal and falls through to the size comparison.
fn quality_rank(file: &FileEntry) -> (u8, u32) {
    if file.category != Category::Audio {
        return (0, 0);
    }
    match file.extension.as_str() {
        ".flac" | ".wav" => (2, 0),
        _ => (1, file.bitrate.unwrap_or(0)),
    }
}

/// Order files inside a group, best first.
///
/// Quality rank descending, then size descending. When two sizes differ by
/// no more than [`SIZE_EPSILON`] they count as equal and the more recently
/// modified file ranks first. Full ties fall back to the path, so the order
/// never depends on discovery order or bucket iteration.
pub fn sort_files(files: &mut [FileEntry]) {
    files.sort_by(|a, b| {
        let by_quality = quality_rank(b).cmp(&quality_rank(a));
        if by_quality != Ordering::Equal {
            return by_quality;
        }
        if a.size.abs_diff(b.size) > SIZE_EPSILON {
            return b.size.cmp(&a.size);
        }
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// Order groups for presentation: total size descending, then member count
/// descending, then key ascending as a deterministic tiebreak.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then_with(|| b.files.len().cmp(&a.files.len()))
            .then_with(|| a.key.cmp(&b.key))
    });
}
