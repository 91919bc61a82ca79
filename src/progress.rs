//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Reporter`] struct which implements
//! [`ProgressCallback`] to display visual progress bars in the terminal.
//! Progress is advisory throughout the pipeline: producers batch their
//! updates and a consumer may observe jumps.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for the scan and detection phases.
///
/// Implement this trait to receive progress updates during the pipeline.
/// All methods may be called from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// `total` is the number of items to process, or 0 when the phase
    /// length is unknown up front (the walking phase).
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each batch of items processed.
    ///
    /// `current` is the cumulative item count and `path` the most recently
    /// processed path.
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a non-fatal error is recorded during a phase.
    fn on_error(&self, _message: &str) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
///
/// Manages one bar per pipeline phase: a spinner while walking (length
/// unknown) and bounded bars for hashing and deleting.
pub struct Reporter {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    deleting: Mutex<Option<ProgressBar>>,
    errors: AtomicUsize,
    quiet: bool,
}

impl Reporter {
    /// Create a new progress reporter.
    ///
    /// If `quiet` is true, no progress bars are displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            deleting: Mutex::new(None),
            errors: AtomicUsize::new(0),
            quiet,
        }
    }

    /// Number of non-fatal errors reported so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn deleting_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn active_bar(&self) -> Option<ProgressBar> {
        if let Some(pb) = self.deleting.lock().unwrap().as_ref() {
            return Some(pb.clone());
        }
        if let Some(pb) = self.hashing.lock().unwrap().as_ref() {
            return Some(pb.clone());
        }
        self.walking.lock().unwrap().as_ref().cloned()
    }
}

impl ProgressCallback for Reporter {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Scanning directories");
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.walking.lock().unwrap() = Some(pb);
            }
            "hashing" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing candidates");
                *self.hashing.lock().unwrap() = Some(pb);
            }
            "deleting" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::deleting_style());
                pb.set_message("Deleting files");
                *self.deleting.lock().unwrap() = Some(pb);
            }
            _ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message(phase.to_string());
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.active_bar() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 40));
        }
    }

    fn on_error(&self, message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        if self.quiet {
            return;
        }
        if let Some(pb) = self.active_bar() {
            pb.println(format!("warning: {}", message));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let slot = match phase {
            "walking" => &self.walking,
            "hashing" => &self.hashing,
            "deleting" => &self.deleting,
            _ => return,
        };
        if let Some(pb) = slot.lock().unwrap().take() {
            pb.finish_with_message(format!("{} complete", capitalize(phase)));
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Truncate a path for display in the progress bar. Lengths are counted in
/// characters, so multibyte file names never split mid-character.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len - max_len + 3).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path() {
        assert_eq!(truncate_path("/a/b.txt", 40), "/a/b.txt");
    }

    #[test]
    fn test_truncate_long_path_keeps_file_name() {
        let path = "/very/long/directory/chain/that/keeps/going/file.txt";
        assert_eq!(truncate_path(path, 20), ".../file.txt");
    }

    #[test]
    fn test_truncate_long_file_name() {
        let path = "/d/an_extremely_long_file_name_that_exceeds_the_limit.txt";
        let result = truncate_path(path, 20);
        assert!(result.starts_with("..."));
        assert_eq!(result.len(), 20);
    }

    #[test]
    fn test_truncate_multibyte_file_name() {
        let name = "é".repeat(30);
        let path = format!("/музыка/{}.mp3", name);
        let result = truncate_path(&path, 20);

        assert!(result.starts_with("..."));
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_quiet_reporter_counts_errors() {
        let reporter = Reporter::new(true);
        reporter.on_error("one");
        reporter.on_error("two");
        assert_eq!(reporter.error_count(), 2);
    }
}
