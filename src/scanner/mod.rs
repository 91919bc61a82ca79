//! Scanner module for directory traversal, classification and hashing.
//!
//! The scanner is divided into submodules:
//! - [`walker`]: depth-bounded directory traversal and file discovery
//! - [`classify`]: extension to category mapping
//! - [`hasher`]: BLAKE3 content hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     min_file_size: 1024, // skip files under 1KB
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(config);
//! let outcome = walker.walk(&[PathBuf::from("/home/user/Downloads")], None);
//! println!("{} files, {} errors", outcome.files.len(), outcome.errors.len());
//! ```

pub mod classify;
pub mod hasher;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use classify::{normalize_extension, Category, CategoryMap};
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::{ScanOutcome, Walker};

/// Metadata for a discovered file.
///
/// Created during traversal and immutable thereafter; owned by the scan
/// session and discarded when a new scan starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File name including extension
    pub name: String,
    /// Extension, normalized lowercase with leading dot (empty if none)
    pub extension: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Creation time, where the filesystem exposes one
    pub created: Option<SystemTime>,
    /// Parent directory
    pub directory: PathBuf,
    /// Semantic category derived from the extension
    pub category: Category,
    /// Declared audio bitrate in kbit/s, when known.
    ///
    /// Never populated by the walker; callers that probe media metadata may
    /// fill it in. Used only as a quality signal when ordering files inside
    /// a duplicate group.
    pub bitrate: Option<u32>,
}

impl FileEntry {
    /// Create an entry from a path and its metadata.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata, categories: &CategoryMap) -> Self {
        let mut entry = Self::new(
            path,
            metadata.len(),
            metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            categories,
        );
        entry.created = metadata.created().ok();
        entry
    }

    /// Create an entry without filesystem access. Mainly useful in tests
    /// and for callers that already hold metadata.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, categories: &CategoryMap) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&name);
        let category = categories.classify(&extension);
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Self {
            path,
            name,
            extension,
            size,
            modified,
            created: None,
            directory,
            category,
            bitrate: None,
        }
    }

    /// Normalized base name: file name without extension, lowercased, with
    /// trailing copy markers stripped. This is the grouping key for all
    /// detection strategies, so `a.mp3` and `a_copy.mp3` share one bucket.
    #[must_use]
    pub fn base_name(&self) -> String {
        let stem = if self.extension.is_empty() {
            self.name.as_str()
        } else {
            &self.name[..self.name.len() - self.extension.len()]
        };
        normalize_base_name(stem)
    }
}

// Copy markers are stripped in sequence: a later rule can fire on what an
// earlier one exposed (e.g. "report_copy (1)" loses "(1)" first, then
// "_copy").
static COPY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[_\s-]*(copy|backup|duplicate)\d*$").unwrap());
static PAREN_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\(\d+\)$").unwrap());
static NUMBER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\s-]+\d+$").unwrap());
static TRAILING_COPY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[_\s-]+copy$").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a file stem for duplicate grouping.
///
/// Lowercases, then strips the usual duplicate markers from the end:
/// `_copy`, `-backup2`, ` (1)`, `_2`, ` - Copy`. A stem that consists of
/// nothing but a marker keeps its lowercased form, so `copy.txt` and
/// `backup.txt` do not collapse into one bucket.
#[must_use]
pub fn normalize_base_name(stem: &str) -> String {
    let lowered = stem.trim().to_lowercase();

    let stripped = COPY_MARKER.replace(&lowered, "");
    let stripped = PAREN_NUMBER.replace(&stripped, "");
    let stripped = NUMBER_SUFFIX.replace(&stripped, "");
    let stripped = TRAILING_COPY.replace(&stripped, "");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ");

    if collapsed.is_empty() {
        lowered
    } else {
        collapsed.into_owned()
    }
}

/// Derive the normalized extension from a file name.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Maximum traversal depth, counted from each root (root = depth 0).
    /// A directory at `max_depth` is not descended into.
    pub max_depth: usize,

    /// Directory names to prune. Matched case-insensitively as a substring
    /// of each path segment; a matching directory is skipped along with its
    /// entire subtree.
    pub excluded_directory_names: Vec<String>,

    /// Extensions to include (normalized with leading dot). Empty = no filter.
    pub allowed_extensions: Vec<String>,

    /// Minimum file size in bytes (inclusive).
    pub min_file_size: u64,

    /// Maximum file size in bytes (inclusive).
    pub max_file_size: u64,

    /// Categories to include. Empty = all categories.
    pub enabled_categories: Vec<Category>,

    /// Number of threads used to walk multiple roots in parallel.
    pub walk_threads: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            excluded_directory_names: Vec::new(),
            allowed_extensions: Vec::new(),
            min_file_size: 0,
            max_file_size: u64::MAX,
            enabled_categories: Vec::new(),
            walk_threads: 4,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// During a walk these are recovered locally and surfaced as aggregated
/// error strings; they never abort the traversal.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
