//! CSV output formatters.
//!
//! One row per duplicate file for scan results, and one row per history
//! entry for deletion records.
//!
//! # Scan result columns
//!
//! - `group_id`: Numeric ID identifying the duplicate group
//! - `strategy`: Detection strategy that produced the group
//! - `key`: Group key (content digest or base name)
//! - `path`: Absolute path to the file
//! - `name`: File name
//! - `size`: File size in bytes
//! - `modified`: Last modified time (RFC 3339)

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::actions::DeleteRecord;
use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the scan result CSV.
#[derive(Debug, Serialize)]
struct CsvRow {
    group_id: usize,
    strategy: String,
    key: String,
    path: String,
    name: String,
    size: u64,
    modified: String,
}

/// CSV formatter for duplicate groups.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for group in self.groups {
            for file in &group.files {
                let modified: DateTime<Utc> = file.modified.into();
                csv_writer.serialize(CsvRow {
                    group_id: group.id,
                    strategy: group.strategy.name().to_string(),
                    key: group.key.clone(),
                    path: file.path.to_string_lossy().to_string(),
                    name: file.name.clone(),
                    size: file.size,
                    modified: modified.to_rfc3339(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

/// CSV formatter for deletion history records.
pub struct HistoryCsvOutput<'a> {
    records: &'a [DeleteRecord],
}

impl<'a> HistoryCsvOutput<'a> {
    /// Create a new history CSV formatter.
    #[must_use]
    pub fn new(records: &'a [DeleteRecord]) -> Self {
        Self { records }
    }

    /// Write the history CSV to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Generate the history CSV as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::Strategy;
    use crate::scanner::{CategoryMap, FileEntry};
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn make_file(path: &str, size: u64) -> FileEntry {
        FileEntry::new(
            PathBuf::from(path),
            size,
            SystemTime::UNIX_EPOCH,
            &CategoryMap::default(),
        )
    }

    #[test]
    fn test_csv_output_basic() {
        let groups = vec![DuplicateGroup::new(
            1,
            "song:1000".to_string(),
            Strategy::NameAndSize,
            vec![make_file("/a/song.mp3", 1000), make_file("/b/song.mp3", 1000)],
        )];

        let csv_str = CsvOutput::new(&groups).to_string().unwrap();

        assert!(csv_str.contains("group_id,strategy,key,path,name,size,modified"));
        assert!(csv_str.contains("name-and-size"));
        assert!(csv_str.contains("/a/song.mp3"));
        assert!(csv_str.contains("/b/song.mp3"));
        assert!(csv_str.contains(",1000,"));
    }

    #[test]
    fn test_csv_output_quotes_commas() {
        let groups = vec![DuplicateGroup::new(
            1,
            "file,with,comma".to_string(),
            Strategy::NameDifferentSize,
            vec![
                make_file("/x/file,with,comma.txt", 10),
                make_file("/y/file,with,comma.txt", 20),
            ],
        )];

        let csv_str = CsvOutput::new(&groups).to_string().unwrap();
        assert!(csv_str.contains('"'));
        assert!(csv_str.contains("file,with,comma.txt"));
    }

    #[test]
    fn test_empty_groups_yield_header_only() {
        let csv_str = CsvOutput::new(&[]).to_string().unwrap();
        // Header rows are only emitted alongside data rows by the csv crate
        assert!(csv_str.is_empty() || csv_str.lines().count() <= 1);
    }

    #[test]
    fn test_history_csv_output() {
        let records = vec![DeleteRecord {
            file_name: "dup.txt".to_string(),
            file_path: PathBuf::from("/data/dup.txt"),
            file_size: 512,
            deleted_at: chrono::Utc::now(),
            reason: "content-hash".to_string(),
        }];

        let csv_str = HistoryCsvOutput::new(&records).to_string().unwrap();
        assert!(csv_str.contains("file_name"));
        assert!(csv_str.contains("dup.txt"));
        assert!(csv_str.contains("512"));
        assert!(csv_str.contains("content-hash"));
    }
}
