//! Duplicate detection pipeline.
//!
//! All strategies start from the same cheap bucketing pass over file
//! metadata. Only [`Strategy::ContentHash`] touches file content: candidate
//! buckets with matching name and size are confirmed byte-identical with
//! BLAKE3 on a bounded rayon pool, so a thousand same-size candidates never
//! turn into a thousand concurrent reads.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use dupesweep::duplicates::{detect, DetectorConfig, Strategy};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(WalkerConfig::default());
//! let outcome = walker.walk(&[PathBuf::from("/data")], None);
//!
//! let config = DetectorConfig::default();
//! let (groups, stats) = detect(&outcome.files, Strategy::ContentHash, &config);
//! println!("{} groups from {} files", groups.len(), stats.input_files);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, FileEntry, Hash, Hasher};

use super::groups::{sort_groups, DuplicateGroup};
use super::Strategy;

/// Configuration for duplicate detection.
#[derive(Clone, Default)]
pub struct DetectorConfig {
    /// Number of I/O threads for parallel hashing. Zero means the default
    /// of 4, chosen to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl DetectorConfig {
    /// Set the I/O thread count for content hashing.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn effective_io_threads(&self) -> usize {
        if self.io_threads == 0 {
            4
        } else {
            self.io_threads
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from a detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorStats {
    /// Files that entered detection.
    pub input_files: usize,
    /// Files that survived metadata bucketing as candidates.
    pub candidate_files: usize,
    /// Files whose content was hashed (content-hash strategy only).
    pub hashed_files: usize,
    /// Files excluded because hashing failed.
    pub failed_files: usize,
    /// Number of confirmed groups.
    pub groups: usize,
    /// Whether the run was interrupted by shutdown.
    pub interrupted: bool,
}

/// Detect duplicate groups among the given files.
///
/// The returned groups are ordered for presentation (largest total size
/// first) with stable ids assigned in that order. Detection is deterministic
/// for a given input set: the same files yield the same groups and ordering
/// regardless of discovery order or thread scheduling.
#[must_use]
pub fn detect(
    files: &[FileEntry],
    strategy: Strategy,
    config: &DetectorConfig,
) -> (Vec<DuplicateGroup>, DetectorStats) {
    let mut stats = DetectorStats {
        input_files: files.len(),
        ..Default::default()
    };

    let mut groups = match strategy {
        Strategy::NameDifferentSize => detect_name_different_size(files, &mut stats),
        Strategy::NameAndSize => detect_name_and_size(files, &mut stats),
        Strategy::ContentHash => detect_content_hash(files, config, &mut stats),
    };

    sort_groups(&mut groups);
    for (id, group) in groups.iter_mut().enumerate() {
        group.id = id;
    }

    stats.groups = groups.len();
    log::info!(
        "detection complete: {} files, {} groups ({})",
        stats.input_files,
        stats.groups,
        strategy
    );

    (groups, stats)
}

/// Buckets with one shared base name and at least two distinct sizes.
/// Every member is included, same-size copies as well.
fn detect_name_different_size(files: &[FileEntry], stats: &mut DetectorStats) -> Vec<DuplicateGroup> {
    let mut buckets: HashMap<String, Vec<FileEntry>> = HashMap::new();
    for file in files {
        buckets.entry(file.base_name()).or_default().push(file.clone());
    }

    buckets
        .into_iter()
        .filter(|(_, members)| {
            if members.len() < 2 {
                return false;
            }
            let first = members[0].size;
            members.iter().any(|f| f.size != first)
        })
        .map(|(base, members)| {
            stats.candidate_files += members.len();
            DuplicateGroup::new(0, base, Strategy::NameDifferentSize, members)
        })
        .collect()
}

/// Buckets sharing base name and exact size.
fn detect_name_and_size(files: &[FileEntry], stats: &mut DetectorStats) -> Vec<DuplicateGroup> {
    bucket_by_name_and_size(files)
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|((base, size), members)| {
            stats.candidate_files += members.len();
            DuplicateGroup::new(
                0,
                format!("{}:{}", base, size),
                Strategy::NameAndSize,
                members,
            )
        })
        .collect()
}

/// Name-and-size buckets narrowed down to byte-identical files.
///
/// Hashing runs on a dedicated bounded pool. A file that fails to hash is
/// logged and excluded; the rest of its bucket is still considered. A group
/// key is the hex content digest shared by its members.
fn detect_content_hash(
    files: &[FileEntry],
    config: &DetectorConfig,
    stats: &mut DetectorStats,
) -> Vec<DuplicateGroup> {
    let candidates: Vec<FileEntry> = bucket_by_name_and_size(files)
        .into_values()
        .filter(|members| members.len() >= 2)
        .flatten()
        .collect();

    stats.candidate_files = candidates.len();
    if candidates.is_empty() {
        return Vec::new();
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", candidates.len());
    }

    log::info!("hashing {} candidate files", candidates.len());

    let hasher = Hasher::new();
    let progress_counter = AtomicUsize::new(0);
    let failed_counter = AtomicUsize::new(0);

    let hash_one = |file: &FileEntry| -> Option<(FileEntry, Hash)> {
        if config.is_shutdown_requested() {
            return None;
        }
        let result = hasher.hash_file(&file.path);
        let done = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(done, &file.path.to_string_lossy());
        }
        match result {
            Ok(hash) => Some((file.clone(), hash)),
            Err(e) => {
                log::warn!("skipping unhashable file: {}", e);
                failed_counter.fetch_add(1, Ordering::Relaxed);
                if let Some(ref callback) = config.progress_callback {
                    callback.on_error(&e.to_string());
                }
                None
            }
        }
    };

    let hashed: Vec<Option<(FileEntry, Hash)>> =
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.effective_io_threads())
            .build()
        {
            Ok(pool) => pool.install(|| candidates.par_iter().map(hash_one).collect()),
            Err(e) => {
                log::warn!("failed to build hashing pool, hashing serially: {}", e);
                candidates.iter().map(hash_one).collect()
            }
        };

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    if config.is_shutdown_requested() {
        stats.interrupted = true;
    }

    stats.failed_files = failed_counter.load(Ordering::Relaxed);

    let mut by_digest: HashMap<Hash, Vec<FileEntry>> = HashMap::new();
    for (file, hash) in hashed.into_iter().flatten() {
        stats.hashed_files += 1;
        by_digest.entry(hash).or_default().push(file);
    }

    by_digest
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(hash, members)| {
            DuplicateGroup::new(0, hash_to_hex(&hash), Strategy::ContentHash, members)
        })
        .collect()
}

fn bucket_by_name_and_size(files: &[FileEntry]) -> HashMap<(String, u64), Vec<FileEntry>> {
    let mut buckets: HashMap<(String, u64), Vec<FileEntry>> = HashMap::new();
    for file in files {
        buckets
            .entry((file.base_name(), file.size))
            .or_default()
            .push(file.clone());
    }
    buckets
}
