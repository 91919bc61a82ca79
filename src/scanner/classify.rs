//! File classification by extension.
//!
//! Maps file extensions to semantic categories (audio, video, image,
//! document, archive). The mapping is plain configuration data: the default
//! table can be replaced wholesale from [`crate::config::ScanConfig`] without
//! touching the walker or the detector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Semantic category of a file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Audio files (mp3, flac, wav, ...)
    Audio,
    /// Video files (mp4, mkv, mov, ...)
    Video,
    /// Image files (jpg, png, gif, ...)
    Image,
    /// Document files (pdf, docx, txt, ...)
    Document,
    /// Archive files (zip, tar, 7z, ...)
    Archive,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories a caller can enable for filtering.
    /// `Other` is excluded: it is the fallback, not a selectable type.
    pub const SELECTABLE: [Category; 5] = [
        Category::Audio,
        Category::Video,
        Category::Image,
        Category::Document,
        Category::Archive,
    ];

    /// Short lowercase name, matching the serde representation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

/// Default extension table, one `(extension, category)` pair per entry.
const DEFAULT_TABLE: &[(&str, Category)] = &[
    (".mp3", Category::Audio),
    (".wav", Category::Audio),
    (".flac", Category::Audio),
    (".aac", Category::Audio),
    (".ogg", Category::Audio),
    (".wma", Category::Audio),
    (".m4a", Category::Audio),
    (".mp4", Category::Video),
    (".avi", Category::Video),
    (".mkv", Category::Video),
    (".mov", Category::Video),
    (".wmv", Category::Video),
    (".flv", Category::Video),
    (".webm", Category::Video),
    (".m4v", Category::Video),
    (".jpg", Category::Image),
    (".jpeg", Category::Image),
    (".png", Category::Image),
    (".gif", Category::Image),
    (".bmp", Category::Image),
    (".tiff", Category::Image),
    (".webp", Category::Image),
    (".svg", Category::Image),
    (".pdf", Category::Document),
    (".doc", Category::Document),
    (".docx", Category::Document),
    (".xls", Category::Document),
    (".xlsx", Category::Document),
    (".ppt", Category::Document),
    (".pptx", Category::Document),
    (".txt", Category::Document),
    (".rtf", Category::Document),
    (".zip", Category::Archive),
    (".rar", Category::Archive),
    (".7z", Category::Archive),
    (".tar", Category::Archive),
    (".gz", Category::Archive),
    (".bz2", Category::Archive),
];

/// Extension to category lookup table.
///
/// Classification is pure and total: unknown or empty extensions map to
/// [`Category::Other`].
#[derive(Debug, Clone)]
pub struct CategoryMap {
    map: HashMap<String, Category>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        let map = DEFAULT_TABLE
            .iter()
            .map(|(ext, cat)| ((*ext).to_string(), *cat))
            .collect();
        Self { map }
    }
}

impl CategoryMap {
    /// Build a map from per-category format lists, as supplied by the
    /// configuration surface. Extensions are normalized to lowercase with a
    /// leading dot, so `"MP3"`, `".mp3"` and `"mp3"` are equivalent.
    #[must_use]
    pub fn from_formats(formats: &HashMap<Category, Vec<String>>) -> Self {
        let mut map = HashMap::new();
        for (category, extensions) in formats {
            for ext in extensions {
                map.insert(normalize_extension(ext), *category);
            }
        }
        Self { map }
    }

    /// Classify an extension. Deterministic and total.
    #[must_use]
    pub fn classify(&self, extension: &str) -> Category {
        if extension.is_empty() {
            return Category::Other;
        }
        self.map
            .get(&normalize_extension(extension))
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Number of known extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Normalize an extension to lowercase with a leading dot.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.starts_with('.') {
        trimmed.to_lowercase()
    } else {
        format!(".{}", trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_classification() {
        let map = CategoryMap::default();

        assert_eq!(map.classify(".mp3"), Category::Audio);
        assert_eq!(map.classify(".flac"), Category::Audio);
        assert_eq!(map.classify(".mkv"), Category::Video);
        assert_eq!(map.classify(".jpeg"), Category::Image);
        assert_eq!(map.classify(".pdf"), Category::Document);
        assert_eq!(map.classify(".7z"), Category::Archive);
    }

    #[test]
    fn test_unknown_extension_is_other() {
        let map = CategoryMap::default();

        assert_eq!(map.classify(".xyz"), Category::Other);
        assert_eq!(map.classify(".rs"), Category::Other);
        assert_eq!(map.classify(""), Category::Other);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let map = CategoryMap::default();

        assert_eq!(map.classify(".MP3"), Category::Audio);
        assert_eq!(map.classify(".Pdf"), Category::Document);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("mp3"), ".mp3");
        assert_eq!(normalize_extension(".MP3"), ".mp3");
        assert_eq!(normalize_extension(" .Flac "), ".flac");
    }

    #[test]
    fn test_from_formats_replaces_table() {
        let mut formats = HashMap::new();
        formats.insert(Category::Audio, vec!["opus".to_string()]);
        let map = CategoryMap::from_formats(&formats);

        assert_eq!(map.classify(".opus"), Category::Audio);
        // The default table does not apply once replaced
        assert_eq!(map.classify(".mp3"), Category::Other);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Audio.name(), "audio");
        assert_eq!(Category::Other.name(), "other");
        assert_eq!(Category::SELECTABLE.len(), 5);
    }
}
