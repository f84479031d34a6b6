/// File filtering: type categories by extension and the case-insensitive
/// name filter.
///
/// These are free functions rather than a trait; the engine calls them
/// directly for every file it visits.
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::FinderError;

const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg", ".ts",
];

const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".svg", ".raw", ".heic", ".ico",
];

const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".tgz", ".tbz2",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".docx", ".doc", ".pdf", ".txt", ".rtf", ".odt", ".xlsx", ".xls", ".pptx", ".ppt", ".csv",
    ".md", ".pages",
];

/// Category of files to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FileType {
    #[default]
    Any,
    Video,
    Image,
    Archive,
    Documents,
}

impl FileType {
    /// The extensions (lower-case, with leading dot) belonging to this type.
    /// `Any` has no list because it accepts everything.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Any => &[],
            FileType::Video => VIDEO_EXTENSIONS,
            FileType::Image => IMAGE_EXTENSIONS,
            FileType::Archive => ARCHIVE_EXTENSIONS,
            FileType::Documents => DOCUMENT_EXTENSIONS,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Any => "Any",
            FileType::Video => "Video",
            FileType::Image => "Image",
            FileType::Archive => "Archive",
            FileType::Documents => "Documents",
        };
        f.write_str(name)
    }
}

impl FromStr for FileType {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(FileType::Any),
            "video" | "videos" => Ok(FileType::Video),
            "image" | "images" => Ok(FileType::Image),
            "archive" | "archives" => Ok(FileType::Archive),
            "document" | "documents" | "docs" => Ok(FileType::Documents),
            _ => Err(FinderError::invalid_filter_value("file type", s)),
        }
    }
}

/// Lower-cased extension of `path` including the leading dot, e.g. `".mp4"`
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Checks if a file belongs to the requested type category
pub fn is_allowed(file_type: FileType, path: &Path) -> bool {
    if file_type == FileType::Any {
        return true;
    }
    match dotted_extension(path) {
        Some(ext) => file_type.extensions().contains(&ext.as_str()),
        None => false,
    }
}

/// Checks if a file name contains `filter`, ignoring case.
/// No filter, or an empty one, matches every name.
pub fn name_matches(filter: Option<&str>, file_name: &str) -> bool {
    match filter {
        None => true,
        Some(f) if f.is_empty() => true,
        Some(f) => file_name.to_lowercase().contains(&f.to_lowercase()),
    }
}
