//! Scan configuration loading and validation.
//!
//! Configuration can come from a JSON file (`--config`) with CLI flags
//! layered on top. Validation is fail-fast: an invalid configuration
//! aborts the run before any filesystem work starts, rather than being
//! silently clamped to something usable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::DeleteOptions;
use crate::duplicates::DetectorConfig;
use crate::scanner::{Category, CategoryMap, WalkerConfig};

/// Default cap on file size: 100 MiB.
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn default_max_depth() -> usize {
    10
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_excluded_directories() -> Vec<String> {
    ["node_modules", ".git", ".vscode", "dist", "build", "target"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_threads() -> usize {
    4
}

/// Errors raised by configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// Path to the config file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Path to the config file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value the scanner cannot work with.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Full scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScanConfig {
    /// Maximum traversal depth from each root.
    pub max_depth: usize,
    /// Minimum file size in bytes (inclusive).
    pub min_file_size: u64,
    /// Maximum file size in bytes (inclusive).
    pub max_file_size: u64,
    /// Directory name tokens to prune during the walk.
    pub excluded_directories: Vec<String>,
    /// Categories to scan. Empty means all.
    pub enabled_categories: Vec<Category>,
    /// Per-category extension lists overriding the built-in table.
    pub formats_per_category: HashMap<Category, Vec<String>>,
    /// Delay between deletions in milliseconds.
    pub delay_between_files_ms: u64,
    /// Threads for content hashing.
    pub io_threads: usize,
    /// Threads for walking multiple roots.
    pub walk_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            min_file_size: 0,
            max_file_size: default_max_file_size(),
            excluded_directories: default_excluded_directories(),
            enabled_categories: Vec::new(),
            formats_per_category: HashMap::new(),
            delay_between_files_ms: 0,
            io_threads: default_threads(),
            walk_threads: default_threads(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed. The
    /// loaded config is not validated here; call [`ScanConfig::validate`]
    /// after applying CLI overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found. A failed validation must abort the
    /// run; none of these conditions are recoverable by clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_file_size > self.max_file_size {
            return Err(ConfigError::Invalid(format!(
                "min_file_size ({}) exceeds max_file_size ({})",
                self.min_file_size, self.max_file_size
            )));
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid(
                "io_threads must be at least 1".to_string(),
            ));
        }
        if self.walk_threads == 0 {
            return Err(ConfigError::Invalid(
                "walk_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the category table: the built-in map unless per-category
    /// formats override it.
    #[must_use]
    pub fn category_map(&self) -> CategoryMap {
        if self.formats_per_category.is_empty() {
            CategoryMap::default()
        } else {
            CategoryMap::from_formats(&self.formats_per_category)
        }
    }

    /// Derive the walker configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_depth: self.max_depth,
            excluded_directory_names: self.excluded_directories.clone(),
            allowed_extensions: Vec::new(),
            min_file_size: self.min_file_size,
            max_file_size: self.max_file_size,
            enabled_categories: self.enabled_categories.clone(),
            walk_threads: self.walk_threads,
        }
    }

    /// Derive the detector configuration.
    #[must_use]
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::default().with_io_threads(self.io_threads)
    }

    /// Derive the deletion options.
    #[must_use]
    pub fn delete_options(&self) -> DeleteOptions {
        DeleteOptions::default()
            .with_delay(Duration::from_millis(self.delay_between_files_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.max_file_size, 100 * 1024 * 1024);
        assert!(config
            .excluded_directories
            .contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_validation_rejects_inverted_size_bounds() {
        let config = ScanConfig {
            min_file_size: 1000,
            max_file_size: 100,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_file_size"));
    }

    #[test]
    fn test_validation_rejects_zero_depth_and_threads() {
        let config = ScanConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScanConfig {
            io_threads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScanConfig {
            walk_threads: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_with_partial_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(br#"{"max_depth": 3, "min_file_size": 1024}"#)
            .unwrap();

        let config = ScanConfig::from_file(&path).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.min_file_size, 1024);
        // Unspecified fields keep their defaults
        assert_eq!(config.io_threads, 4);
    }

    #[test]
    fn test_from_file_missing() {
        let err = ScanConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = ScanConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_walker_config_derivation() {
        let config = ScanConfig {
            max_depth: 5,
            min_file_size: 10,
            max_file_size: 1000,
            excluded_directories: vec!["cache".to_string()],
            ..Default::default()
        };
        let walker = config.walker_config();

        assert_eq!(walker.max_depth, 5);
        assert_eq!(walker.min_file_size, 10);
        assert_eq!(walker.max_file_size, 1000);
        assert_eq!(walker.excluded_directory_names, vec!["cache".to_string()]);
    }

    #[test]
    fn test_category_map_override() {
        let mut formats = HashMap::new();
        formats.insert(Category::Audio, vec!["opus".to_string()]);
        let config = ScanConfig {
            formats_per_category: formats,
            ..Default::default()
        };

        let map = config.category_map();
        assert_eq!(map.classify(".opus"), Category::Audio);
        assert_eq!(map.classify(".mp3"), Category::Other);
    }
}
