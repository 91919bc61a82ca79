//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Strategy selection (content hash or name-based comparison)
//! - Candidate bucketing and BLAKE3 confirmation
//! - Duplicate group management and ordering

pub mod finder;
pub mod groups;

use serde::{Deserialize, Serialize};

pub use finder::{detect, DetectorConfig, DetectorStats};
pub use groups::DuplicateGroup;

/// Detection strategy.
///
/// All strategies bucket on the normalized base name first; they differ in
/// how a bucket is confirmed as a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Same base name and size, confirmed byte-identical via BLAKE3.
    ContentHash,
    /// Same base name and exact size. No content is read.
    NameAndSize,
    /// Same base name with at least two distinct sizes. Flags likely
    /// different versions of the same file.
    NameDifferentSize,
}

impl Strategy {
    /// Short kebab-case name, matching the serde representation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ContentHash => "content-hash",
            Self::NameAndSize => "name-and-size",
            Self::NameDifferentSize => "name-different-size",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::ContentHash.name(), "content-hash");
        assert_eq!(Strategy::NameAndSize.name(), "name-and-size");
        assert_eq!(Strategy::NameDifferentSize.name(), "name-different-size");
    }

    #[test]
    fn test_strategy_serde_round_trip() {
        let json = serde_json::to_string(&Strategy::NameAndSize).unwrap();
        assert_eq!(json, "\"name-and-size\"");
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Strategy::NameAndSize);
    }
}
