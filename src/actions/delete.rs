//! Safe, controllable file deletion.
//!
//! # Overview
//!
//! Deletion runs as a single-threaded pipeline over an ordered list of
//! files. Each file is first moved to the system trash; only when the trash
//! operation itself fails does the pipeline fall back to permanent removal.
//! After either attempt the pipeline verifies the file is gone before
//! counting it as deleted.
//!
//! A shared [`DeleteController`] lets another thread pause, resume or cancel
//! the run. Cancellation wins over pause: a paused pipeline that is
//! cancelled wakes up and stops. Files not yet processed when a run stops
//! are reported as [`DeleteOutcome::Pending`].
//!
//! # Safety
//!
//! A failed deletion never stops the batch, and a file that still exists
//! after a trash call is reported as failed rather than silently retried.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scanner::FileEntry;

/// Longest uninterrupted sleep inside a between-file delay. Cancellation is
/// observed at slice boundaries.
const DELAY_SLICE: Duration = Duration::from_millis(100);

/// Poll interval while paused.
const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Outcome of one deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum DeleteOutcome {
    /// Not processed yet (run was cancelled or interrupted first).
    Pending,
    /// Moved to the system trash and verified gone.
    SoftDeleted,
    /// Permanently removed after the trash operation failed.
    HardDeleted,
    /// Neither attempt removed the file.
    Failed(String),
}

impl DeleteOutcome {
    /// Whether the file was actually removed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::SoftDeleted | Self::HardDeleted)
    }
}

/// One file's journey through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTask {
    /// Path that was (or was going to be) deleted.
    pub path: PathBuf,
    /// Zero-based retry counter. Stays 0: the trash-then-remove chain is a
    /// single attempt, not a retry loop.
    pub attempt: u32,
    /// What happened to the file.
    pub outcome: DeleteOutcome,
}

/// History entry for a successfully deleted file.
///
/// Failed and pending deletions are deliberately absent from history: the
/// record answers "what did I delete", not "what did I try".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecord {
    /// File name including extension.
    pub file_name: String,
    /// Full path at deletion time.
    pub file_path: PathBuf,
    /// Size in bytes at deletion time.
    pub file_size: u64,
    /// When the deletion was verified.
    pub deleted_at: DateTime<Utc>,
    /// Why the file was deleted (strategy or user-supplied reason).
    pub reason: String,
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct DeleteBatchResult {
    /// One task per input file, in input order.
    pub tasks: Vec<DeleteTask>,
    /// History records for verified deletions. Empty when the run was
    /// cancelled.
    pub records: Vec<DeleteRecord>,
    /// Total bytes freed.
    pub bytes_freed: u64,
    /// Whether the run stopped before processing every file.
    pub cancelled: bool,
}

impl DeleteBatchResult {
    /// Number of files actually removed.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.outcome.is_success()).count()
    }

    /// Number of files that failed to delete.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, DeleteOutcome::Failed(_)))
            .count()
    }

    /// Number of files never reached.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.outcome == DeleteOutcome::Pending)
            .count()
    }

    /// Check if every file was removed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.tasks.iter().all(|t| t.outcome.is_success())
    }

    /// Human-readable summary of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "deleted {} file(s), freed {} bytes",
            self.success_count(),
            self.bytes_freed
        )];
        if self.failure_count() > 0 {
            parts.push(format!("{} failed", self.failure_count()));
        }
        if self.pending_count() > 0 {
            parts.push(format!("{} not processed", self.pending_count()));
        }
        if self.cancelled {
            parts.push("cancelled".to_string());
        }
        parts.join(", ")
    }
}

/// Shared mutable state of one deletion session.
#[derive(Debug, Default)]
struct SessionState {
    running: AtomicBool,
    paused: AtomicBool,
    cancelled: AtomicBool,
    current: AtomicUsize,
    total: AtomicUsize,
    current_file: Mutex<String>,
}

impl SessionState {
    fn reset(&self, total: usize) {
        self.running.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
        self.current.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
        self.current_file.lock().unwrap().clear();
    }
}

/// Point-in-time snapshot of a deletion session.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteStatus {
    /// Whether a run is in flight.
    pub running: bool,
    /// Whether the run is paused.
    pub paused: bool,
    /// Whether cancellation was requested.
    pub cancelled: bool,
    /// 1-based index of the file being processed.
    pub current: usize,
    /// Total files in the batch.
    pub total: usize,
    /// Name of the file being processed.
    pub current_file: String,
}

/// Handle for controlling a running deletion from another thread.
///
/// Cloneable; all clones observe and steer the same session.
#[derive(Debug, Clone)]
pub struct DeleteController {
    state: Arc<SessionState>,
}

impl DeleteController {
    /// Pause the pipeline before the next file. No-op if cancelled.
    pub fn pause(&self) {
        self.state.paused.store(true, Ordering::SeqCst);
        log::info!("deletion paused");
    }

    /// Resume a paused pipeline.
    pub fn resume(&self) {
        self.state.paused.store(false, Ordering::SeqCst);
        log::info!("deletion resumed");
    }

    /// Request cancellation. Takes effect at the next file boundary, or
    /// immediately when the pipeline is paused or sleeping.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        log::info!("deletion cancelled");
    }

    /// Snapshot the session state.
    #[must_use]
    pub fn status(&self) -> DeleteStatus {
        DeleteStatus {
            running: self.state.running.load(Ordering::SeqCst),
            paused: self.state.paused.load(Ordering::SeqCst),
            cancelled: self.state.cancelled.load(Ordering::SeqCst),
            current: self.state.current.load(Ordering::SeqCst),
            total: self.state.total.load(Ordering::SeqCst),
            current_file: self.state.current_file.lock().unwrap().clone(),
        }
    }
}

/// Storage speed probe, used to scale the between-file delay.
pub trait SlowStorage: Send + Sync {
    /// Whether the given path lives on storage that needs gentler pacing.
    fn is_slow_storage(&self, path: &Path) -> bool;
}

/// Default probe based on Windows-style drive letters.
///
/// Paths on drives outside `C:` through `F:` are treated as slow, on the
/// assumption that higher letters are mapped network shares or external
/// disks. Paths without a drive letter are treated as fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct DriveLetterHeuristic;

impl SlowStorage for DriveLetterHeuristic {
    fn is_slow_storage(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        let mut chars = text.chars();
        let (Some(letter), Some(':')) = (chars.next(), chars.next()) else {
            return false;
        };
        letter.is_ascii_uppercase() && !('C'..='F').contains(&letter)
    }
}

/// Callback trait for deletion lifecycle events.
pub trait DeleteEventCallback: Send + Sync {
    /// Called before each file is processed. `index` is 0-based.
    fn on_file_started(&self, _path: &Path, _index: usize, _total: usize) {}

    /// Called after each file is processed, successfully or not.
    fn on_file_finished(&self, _task: &DeleteTask) {}

    /// Called once when a run completes normally. Not called after
    /// cancellation.
    fn on_batch_finished(&self, _result: &DeleteBatchResult) {}
}

/// Configuration for the deletion pipeline.
#[derive(Clone)]
pub struct DeleteOptions {
    /// Delay inserted between consecutive files. Zero disables pacing.
    pub delay_between_files: Duration,
    /// Multiplier applied to the delay for files on slow storage.
    pub slow_storage_multiplier: u32,
    /// Reason recorded in history entries.
    pub reason: String,
    /// Storage speed probe.
    pub slow_storage: Arc<dyn SlowStorage>,
    /// Optional process-level shutdown flag, treated like cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for DeleteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteOptions")
            .field("delay_between_files", &self.delay_between_files)
            .field("slow_storage_multiplier", &self.slow_storage_multiplier)
            .field("reason", &self.reason)
            .field("shutdown_flag", &self.shutdown_flag)
            .finish()
    }
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            delay_between_files: Duration::ZERO,
            slow_storage_multiplier: 2,
            reason: "duplicate".to_string(),
            slow_storage: Arc::new(DriveLetterHeuristic),
            shutdown_flag: None,
        }
    }
}

impl DeleteOptions {
    /// Set the delay between consecutive files.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_files = delay;
        self
    }

    /// Set the slow storage multiplier.
    #[must_use]
    pub fn with_slow_storage_multiplier(mut self, multiplier: u32) -> Self {
        self.slow_storage_multiplier = multiplier.max(1);
        self
    }

    /// Set the history reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Replace the storage speed probe.
    #[must_use]
    pub fn with_slow_storage(mut self, probe: Arc<dyn SlowStorage>) -> Self {
        self.slow_storage = probe;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

/// The deletion pipeline.
///
/// One pipeline owns one session. [`DeletePipeline::controller`] hands out
/// handles that steer the run from other threads.
pub struct DeletePipeline {
    options: DeleteOptions,
    state: Arc<SessionState>,
}

impl DeletePipeline {
    /// Create a pipeline with the given options.
    #[must_use]
    pub fn new(options: DeleteOptions) -> Self {
        Self {
            options,
            state: Arc::new(SessionState::default()),
        }
    }

    /// Get a controller for this pipeline's session.
    #[must_use]
    pub fn controller(&self) -> DeleteController {
        DeleteController {
            state: Arc::clone(&self.state),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
            || self
                .options
                .shutdown_flag
                .as_ref()
                .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Delete the given files in order.
    ///
    /// Returns one task per input file. When the run is cancelled, files
    /// not yet reached carry [`DeleteOutcome::Pending`], no history records
    /// are produced and the batch-finished event is skipped.
    pub fn run(
        &self,
        files: &[FileEntry],
        callback: Option<&dyn DeleteEventCallback>,
    ) -> DeleteBatchResult {
        self.state.reset(files.len());
        let mut result = DeleteBatchResult::default();

        log::info!("deleting {} file(s)", files.len());

        for (index, file) in files.iter().enumerate() {
            if self.is_cancelled() {
                result.cancelled = true;
                break;
            }

            // Pacing applies between files, never before the first
            if index > 0 && !self.options.delay_between_files.is_zero() {
                let delay = self.delay_for(&file.path);
                if !self.interruptible_delay(delay) {
                    result.cancelled = true;
                    break;
                }
            }

            if !self.wait_while_paused() {
                result.cancelled = true;
                break;
            }

            self.state.current.store(index + 1, Ordering::SeqCst);
            *self.state.current_file.lock().unwrap() = file.name.clone();

            if let Some(cb) = callback {
                cb.on_file_started(&file.path, index, files.len());
            }

            let (outcome, size) = delete_one(&file.path);

            if outcome.is_success() {
                result.bytes_freed += size;
                result.records.push(DeleteRecord {
                    file_name: file.name.clone(),
                    file_path: file.path.clone(),
                    file_size: size,
                    deleted_at: Utc::now(),
                    reason: self.options.reason.clone(),
                });
            }

            let task = DeleteTask {
                path: file.path.clone(),
                attempt: 0,
                outcome,
            };
            if let Some(cb) = callback {
                cb.on_file_finished(&task);
            }
            result.tasks.push(task);
        }

        // Unprocessed files surface as pending tasks
        for file in files.iter().skip(result.tasks.len()) {
            result.tasks.push(DeleteTask {
                path: file.path.clone(),
                attempt: 0,
                outcome: DeleteOutcome::Pending,
            });
        }

        if result.cancelled {
            // A cancelled run leaves no history behind
            result.records.clear();
        } else if let Some(cb) = callback {
            cb.on_batch_finished(&result);
        }

        self.state.running.store(false, Ordering::SeqCst);
        log::info!("{}", result.summary());

        result
    }

    fn delay_for(&self, path: &Path) -> Duration {
        if self.options.slow_storage.is_slow_storage(path) {
            log::debug!("slow storage pacing for {}", path.display());
            self.options.delay_between_files * self.options.slow_storage_multiplier
        } else {
            self.options.delay_between_files
        }
    }

    /// Sleep for `delay` in small slices, observing cancellation at each
    /// slice and blocking (without consuming delay time) while paused.
    /// Returns false if cancelled.
    fn interruptible_delay(&self, delay: Duration) -> bool {
        let mut remaining = delay;
        while !remaining.is_zero() {
            if self.is_cancelled() {
                return false;
            }
            if !self.wait_while_paused() {
                return false;
            }
            let slice = remaining.min(DELAY_SLICE);
            std::thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
        true
    }

    /// Block while the session is paused. Returns false if cancelled.
    fn wait_while_paused(&self) -> bool {
        while self.state.paused.load(Ordering::SeqCst) {
            if self.is_cancelled() {
                return false;
            }
            std::thread::sleep(PAUSE_POLL);
        }
        !self.is_cancelled()
    }
}

/// Delete one file: trash first, permanent removal as fallback, then verify.
/// Returns the outcome and the file's size before deletion.
fn delete_one(path: &Path) -> (DeleteOutcome, u64) {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            let message = match e.kind() {
                io::ErrorKind::NotFound => format!("file not found: {}", path.display()),
                io::ErrorKind::PermissionDenied => {
                    format!("permission denied: {}", path.display())
                }
                _ => format!("cannot access {}: {}", path.display(), e),
            };
            log::warn!("{}", message);
            return (DeleteOutcome::Failed(message), 0);
        }
    };
    let size = metadata.len();

    match trash::delete(path) {
        Ok(()) => {
            if path.exists() {
                let message = format!("still present after move to trash: {}", path.display());
                log::error!("{}", message);
                (DeleteOutcome::Failed(message), size)
            } else {
                log::info!("moved to trash: {} ({} bytes)", path.display(), size);
                (DeleteOutcome::SoftDeleted, size)
            }
        }
        Err(trash_err) => {
            log::warn!(
                "trash failed for {}, falling back to permanent delete: {}",
                path.display(),
                trash_err
            );
            match fs::remove_file(path) {
                Ok(()) => {
                    if path.exists() {
                        let message =
                            format!("still present after permanent delete: {}", path.display());
                        log::error!("{}", message);
                        (DeleteOutcome::Failed(message), size)
                    } else {
                        log::info!("permanently deleted: {} ({} bytes)", path.display(), size);
                        (DeleteOutcome::HardDeleted, size)
                    }
                }
                Err(remove_err) => {
                    let message = format!(
                        "trash failed ({}) and permanent delete failed ({}) for {}",
                        trash_err,
                        remove_err,
                        path.display()
                    );
                    log::error!("{}", message);
                    (DeleteOutcome::Failed(message), size)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::CategoryMap;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_entry(dir: &TempDir, name: &str, content: &[u8]) -> FileEntry {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        let metadata = fs::metadata(&path).unwrap();
        FileEntry::from_metadata(path, &metadata, &CategoryMap::default())
    }

    #[test]
    fn test_outcome_success_predicate() {
        assert!(DeleteOutcome::SoftDeleted.is_success());
        assert!(DeleteOutcome::HardDeleted.is_success());
        assert!(!DeleteOutcome::Pending.is_success());
        assert!(!DeleteOutcome::Failed("x".to_string()).is_success());
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let (outcome, size) = delete_one(Path::new("/nonexistent/file.txt"));
        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
        assert_eq!(size, 0);
    }

    #[test]
    fn test_pipeline_removes_files() {
        let dir = TempDir::new().unwrap();
        let a = create_entry(&dir, "a.txt", b"aaa");
        let b = create_entry(&dir, "b.txt", b"bbbb");

        let pipeline = DeletePipeline::new(DeleteOptions::default().with_reason("test"));
        let result = pipeline.run(&[a.clone(), b.clone()], None);

        assert!(result.all_succeeded());
        assert!(!a.path.exists());
        assert!(!b.path.exists());
        assert_eq!(result.bytes_freed, 7);
        assert_eq!(result.records.len(), 2);
        assert!(result.records.iter().all(|r| r.reason == "test"));
        assert!(!result.cancelled);
    }

    #[test]
    fn test_failed_files_do_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        let good = create_entry(&dir, "good.txt", b"data");
        let map = CategoryMap::default();
        let ghost = FileEntry::new(
            PathBuf::from("/nonexistent/ghost.txt"),
            4,
            std::time::SystemTime::UNIX_EPOCH,
            &map,
        );

        let pipeline = DeletePipeline::new(DeleteOptions::default());
        let result = pipeline.run(&[ghost, good.clone()], None);

        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.success_count(), 1);
        assert!(!good.path.exists());
        // Only the verified deletion makes it into history
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].file_name, "good.txt");
    }

    #[test]
    fn test_cancel_leaves_pending_tasks_and_no_records() {
        struct CancelAfterFirst {
            controller: DeleteController,
            batch_finished: AtomicBool,
        }
        impl DeleteEventCallback for CancelAfterFirst {
            fn on_file_finished(&self, _task: &DeleteTask) {
                self.controller.cancel();
            }
            fn on_batch_finished(&self, _result: &DeleteBatchResult) {
                self.batch_finished.store(true, Ordering::SeqCst);
            }
        }

        let dir = TempDir::new().unwrap();
        let files: Vec<FileEntry> = (0..3)
            .map(|i| create_entry(&dir, &format!("f{}.txt", i), b"data"))
            .collect();

        let pipeline = DeletePipeline::new(DeleteOptions::default());
        let callback = CancelAfterFirst {
            controller: pipeline.controller(),
            batch_finished: AtomicBool::new(false),
        };
        let result = pipeline.run(&files, Some(&callback));

        assert!(result.cancelled);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.pending_count(), 2);
        assert!(result.records.is_empty());
        assert!(!callback.batch_finished.load(Ordering::SeqCst));
        // Unreached files are untouched
        assert!(files[1].path.exists());
        assert!(files[2].path.exists());
    }

    #[test]
    fn test_shutdown_flag_acts_like_cancel() {
        let dir = TempDir::new().unwrap();
        let file = create_entry(&dir, "x.txt", b"data");

        let flag = Arc::new(AtomicBool::new(true));
        let pipeline = DeletePipeline::new(DeleteOptions::default().with_shutdown_flag(flag));
        let result = pipeline.run(&[file.clone()], None);

        assert!(result.cancelled);
        assert_eq!(result.pending_count(), 1);
        assert!(file.path.exists());
    }

    #[test]
    fn test_delay_applies_between_files_only() {
        let dir = TempDir::new().unwrap();
        let files: Vec<FileEntry> = (0..3)
            .map(|i| create_entry(&dir, &format!("d{}.txt", i), b"data"))
            .collect();

        let delay = Duration::from_millis(120);
        let pipeline = DeletePipeline::new(DeleteOptions::default().with_delay(delay));

        let start = std::time::Instant::now();
        let result = pipeline.run(&files, None);
        let elapsed = start.elapsed();

        assert!(result.all_succeeded());
        // Two gaps of 120ms for three files
        assert!(elapsed >= Duration::from_millis(240), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_slow_storage_multiplies_delay() {
        struct AlwaysSlow;
        impl SlowStorage for AlwaysSlow {
            fn is_slow_storage(&self, _path: &Path) -> bool {
                true
            }
        }

        let dir = TempDir::new().unwrap();
        let files: Vec<FileEntry> = (0..2)
            .map(|i| create_entry(&dir, &format!("s{}.txt", i), b"data"))
            .collect();

        let pipeline = DeletePipeline::new(
            DeleteOptions::default()
                .with_delay(Duration::from_millis(100))
                .with_slow_storage_multiplier(3)
                .with_slow_storage(Arc::new(AlwaysSlow)),
        );

        let start = std::time::Instant::now();
        pipeline.run(&files, None);
        let elapsed = start.elapsed();

        // One gap of 100ms * 3
        assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_pause_blocks_until_resumed() {
        let dir = TempDir::new().unwrap();
        let files: Vec<FileEntry> = (0..2)
            .map(|i| create_entry(&dir, &format!("p{}.txt", i), b"data"))
            .collect();

        let pipeline = DeletePipeline::new(DeleteOptions::default());
        let controller = pipeline.controller();
        controller.pause();

        let resumer = {
            let controller = controller.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(200));
                controller.resume();
            })
        };

        let start = std::time::Instant::now();
        let result = pipeline.run(&files, None);
        let elapsed = start.elapsed();
        resumer.join().unwrap();

        assert!(result.all_succeeded());
        assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_cancel_wins_over_pause() {
        let dir = TempDir::new().unwrap();
        let file = create_entry(&dir, "c.txt", b"data");

        let pipeline = DeletePipeline::new(DeleteOptions::default());
        let controller = pipeline.controller();
        controller.pause();
        controller.cancel();

        let start = std::time::Instant::now();
        let result = pipeline.run(&[file.clone()], None);

        // Does not hang waiting for resume
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(result.cancelled);
        assert!(file.path.exists());
    }

    #[test]
    fn test_controller_status_reflects_completion() {
        let dir = TempDir::new().unwrap();
        let file = create_entry(&dir, "s.txt", b"data");

        let pipeline = DeletePipeline::new(DeleteOptions::default());
        let controller = pipeline.controller();
        pipeline.run(&[file], None);

        let status = controller.status();
        assert!(!status.running);
        assert_eq!(status.current, 1);
        assert_eq!(status.total, 1);
        assert_eq!(status.current_file, "s.txt");
    }

    #[test]
    fn test_drive_letter_heuristic() {
        let probe = DriveLetterHeuristic;
        assert!(!probe.is_slow_storage(Path::new("C:\\data\\file.txt")));
        assert!(!probe.is_slow_storage(Path::new("D:\\file.txt")));
        assert!(!probe.is_slow_storage(Path::new("F:\\file.txt")));
        assert!(probe.is_slow_storage(Path::new("G:\\share\\file.txt")));
        assert!(probe.is_slow_storage(Path::new("Z:\\file.txt")));
        assert!(!probe.is_slow_storage(Path::new("/home/user/file.txt")));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&DeleteOutcome::SoftDeleted).unwrap();
        assert!(json.contains("soft-deleted"));

        let failed = DeleteOutcome::Failed("no permission".to_string());
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("failed"));
        assert!(json.contains("no permission"));
    }
}
