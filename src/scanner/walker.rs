//! Depth-bounded directory walker.
//!
//! Traverses one or more roots depth-first and produces a flat list of
//! [`FileEntry`] values plus a list of human-readable error strings.
//! Access failures never abort the walk: a failed file or directory is
//! recorded and traversal continues. Multiple roots are walked with bounded
//! parallelism on a dedicated rayon pool.
//!
//! Callers must not depend on result ordering beyond "all matching files are
//! present exactly once": within a root, files arrive in filesystem listing
//! order; across roots there is no guarantee.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::progress::ProgressCallback;

use super::{CategoryMap, FileEntry, ScanError, WalkerConfig};

/// Number of files between progress ticks.
const PROGRESS_BATCH: usize = 10;

/// Result of a walk: discovered files plus non-fatal errors.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// All files that passed the configured filters.
    pub files: Vec<FileEntry>,
    /// Human-readable access errors encountered along the way.
    pub errors: Vec<String>,
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    config: WalkerConfig,
    categories: CategoryMap,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a walker with the default category table.
    #[must_use]
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            categories: CategoryMap::default(),
            shutdown_flag: None,
        }
    }

    /// Replace the category table used to tag discovered files.
    #[must_use]
    pub fn with_categories(mut self, categories: CategoryMap) -> Self {
        self.categories = categories;
        self
    }

    /// Set the shutdown flag for cooperative cancellation. When the flag
    /// turns `true` the walk stops at the next entry boundary.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk all roots and collect files and errors.
    ///
    /// Roots are walked independently and results concatenated in root
    /// order. Progress is advisory: ticks are batched every few files and a
    /// consumer may miss intermediate updates. Passing the same root twice
    /// is the caller's responsibility to avoid.
    pub fn walk(
        &self,
        roots: &[PathBuf],
        progress: Option<&(dyn ProgressCallback)>,
    ) -> ScanOutcome {
        if let Some(cb) = progress {
            cb.on_phase_start("walking", 0);
        }

        let scanned = AtomicUsize::new(0);

        let per_root: Vec<ScanOutcome> = if roots.len() > 1 && self.config.walk_threads > 1 {
            let threads = self.config.walk_threads.min(roots.len());
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| {
                    roots
                        .par_iter()
                        .map(|root| self.walk_root(root, progress, &scanned))
                        .collect()
                }),
                Err(e) => {
                    log::warn!("failed to build walk pool, walking serially: {}", e);
                    roots
                        .iter()
                        .map(|root| self.walk_root(root, progress, &scanned))
                        .collect()
                }
            }
        } else {
            roots
                .iter()
                .map(|root| self.walk_root(root, progress, &scanned))
                .collect()
        };

        let mut outcome = ScanOutcome::default();
        for mut part in per_root {
            outcome.files.append(&mut part.files);
            outcome.errors.append(&mut part.errors);
        }

        if let Some(cb) = progress {
            cb.on_phase_end("walking");
        }

        log::info!(
            "walk complete: {} files, {} errors",
            outcome.files.len(),
            outcome.errors.len()
        );

        outcome
    }

    /// Walk a single root depth-first.
    fn walk_root(
        &self,
        root: &Path,
        progress: Option<&(dyn ProgressCallback)>,
        scanned: &AtomicUsize,
    ) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let walk = WalkDir::new(root)
            .max_depth(self.config.max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                // Root is never pruned; excluded names apply to subdirectories
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                !self.is_excluded_dir(&e.file_name().to_string_lossy())
            });

        for entry in walk {
            if self.is_shutdown_requested() {
                log::debug!("walker: shutdown requested, stopping {}", root.display());
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // One error per unreadable directory; its subtree yields
                    // nothing and the walk continues.
                    let message = scan_error_from(root, e).to_string();
                    log::warn!("{}", message);
                    if let Some(cb) = progress {
                        cb.on_error(&message);
                    }
                    outcome.errors.push(message);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    let message = scan_error_from(root, e).to_string();
                    log::warn!("{}", message);
                    if let Some(cb) = progress {
                        cb.on_error(&message);
                    }
                    outcome.errors.push(message);
                    continue;
                }
            };

            let file = FileEntry::from_metadata(path.to_path_buf(), &metadata, &self.categories);

            if !self.passes_filters(&file) {
                continue;
            }

            let count = scanned.fetch_add(1, Ordering::Relaxed) + 1;
            if count % PROGRESS_BATCH == 0 {
                if let Some(cb) = progress {
                    cb.on_progress(count, &file.path.to_string_lossy());
                }
            }

            outcome.files.push(file);
        }

        outcome
    }

    /// Case-insensitive substring match against excluded directory tokens.
    fn is_excluded_dir(&self, dir_name: &str) -> bool {
        if self.config.excluded_directory_names.is_empty() {
            return false;
        }
        let lower = dir_name.to_lowercase();
        self.config
            .excluded_directory_names
            .iter()
            .any(|token| !token.is_empty() && lower.contains(&token.to_lowercase()))
    }

    fn passes_filters(&self, file: &FileEntry) -> bool {
        if file.size < self.config.min_file_size || file.size > self.config.max_file_size {
            log::trace!(
                "skipping {} (size {} outside bounds)",
                file.path.display(),
                file.size
            );
            return false;
        }

        if !self.config.allowed_extensions.is_empty()
            && !self
                .config
                .allowed_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(&file.extension))
        {
            return false;
        }

        if !self.config.enabled_categories.is_empty()
            && !self.config.enabled_categories.contains(&file.category)
        {
            return false;
        }

        true
    }
}

/// Classify a traversal failure. The walk only reports these as strings,
/// but classification keeps the common cases readable in logs.
fn scan_error_from(root: &Path, err: walkdir::Error) -> ScanError {
    let path = err
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    match err.io_error().map(io::Error::kind) {
        Some(io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
        Some(io::ErrorKind::NotFound) => ScanError::NotFound(path),
        _ => {
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            ScanError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Category;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "one.txt", b"hello world");
        write_file(dir.path(), "two.mp3", b"not really audio");

        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_file(&sub, "nested.txt", b"nested content");

        dir
    }

    #[test]
    fn test_walker_finds_files() {
        let dir = create_test_tree();
        let walker = Walker::new(WalkerConfig::default());

        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        assert_eq!(outcome.files.len(), 3);
        assert!(outcome.errors.is_empty());
        for file in &outcome.files {
            assert!(file.size > 0);
            assert!(file.path.exists());
        }
    }

    #[test]
    fn test_walker_max_depth() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "top.txt", b"top");
        let level1 = dir.path().join("level1");
        fs::create_dir(&level1).unwrap();
        write_file(&level1, "mid.txt", b"mid");
        let level2 = level1.join("level2");
        fs::create_dir(&level2).unwrap();
        write_file(&level2, "deep.txt", b"deep");

        // level1 sits at depth 1 and is not descended into
        let config = WalkerConfig {
            max_depth: 1,
            ..Default::default()
        };
        let walker = Walker::new(config);
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        let names: Vec<_> = outcome.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["top.txt"]);
    }

    #[test]
    fn test_walker_excluded_dirs_substring_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "keep.txt", b"keep");

        let excluded = dir.path().join("My_Node_Modules_Cache");
        fs::create_dir(&excluded).unwrap();
        write_file(&excluded, "dropped.txt", b"dropped");
        let nested = excluded.join("deeper");
        fs::create_dir(&nested).unwrap();
        write_file(&nested, "also_dropped.txt", b"dropped too");

        let config = WalkerConfig {
            excluded_directory_names: vec!["node_modules".to_string()],
            ..Default::default()
        };
        let walker = Walker::new(config);
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        let names: Vec<_> = outcome.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[test]
    fn test_walker_size_bounds_inclusive() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "tiny.txt", b"abc"); // 3 bytes
        write_file(dir.path(), "exact.txt", b"abcde"); // 5 bytes
        write_file(dir.path(), "big.txt", &vec![0u8; 100]);

        let config = WalkerConfig {
            min_file_size: 5,
            max_file_size: 50,
            ..Default::default()
        };
        let walker = Walker::new(config);
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        let names: Vec<_> = outcome.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["exact.txt"]);
    }

    #[test]
    fn test_walker_allowed_extensions() {
        let dir = create_test_tree();
        let config = WalkerConfig {
            allowed_extensions: vec![".mp3".to_string()],
            ..Default::default()
        };
        let walker = Walker::new(config);
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].name, "two.mp3");
    }

    #[test]
    fn test_walker_category_filter() {
        let dir = create_test_tree();
        let config = WalkerConfig {
            enabled_categories: vec![Category::Audio],
            ..Default::default()
        };
        let walker = Walker::new(config);
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].category, Category::Audio);
    }

    #[test]
    fn test_walker_multiple_roots_concatenated() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        write_file(dir_a.path(), "a.txt", b"aaa");
        write_file(dir_b.path(), "b.txt", b"bbb");

        let walker = Walker::new(WalkerConfig::default());
        let outcome = walker.walk(
            &[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()],
            None,
        );

        assert_eq!(outcome.files.len(), 2);
    }

    #[test]
    fn test_walker_nonexistent_root_records_error() {
        let walker = Walker::new(WalkerConfig::default());
        let outcome = walker.walk(&[PathBuf::from("/nonexistent/path/12345")], None);

        assert!(outcome.files.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("path not found"));
    }

    #[test]
    fn test_walker_shutdown_flag_stops_early() {
        let dir = create_test_tree();
        let flag = Arc::new(AtomicBool::new(true));
        let walker = Walker::new(WalkerConfig::default()).with_shutdown_flag(Arc::clone(&flag));

        let outcome = walker.walk(&[dir.path().to_path_buf()], None);
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn test_file_entry_fields_populated() {
        let dir = create_test_tree();
        let walker = Walker::new(WalkerConfig::default());
        let outcome = walker.walk(&[dir.path().to_path_buf()], None);

        let mp3 = outcome
            .files
            .iter()
            .find(|f| f.name == "two.mp3")
            .expect("mp3 entry");
        assert_eq!(mp3.extension, ".mp3");
        assert_eq!(mp3.category, Category::Audio);
        assert_eq!(mp3.directory, dir.path());
        assert!(mp3.size > 0);
    }
}
