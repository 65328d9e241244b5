//! Attachment storage keys and download metadata.
//!
//! Keys follow the `<unixMillis>-<originalFilename>` naming contract used by
//! previously stored files. Keys never contain path separators, so a key
//! always names a single entry directly inside the uploads directory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised while parsing a storage key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageKeyError {
    #[error("storage key must not be empty")]
    Empty,
    #[error("storage key must not contain path separators or parent references")]
    Traversal,
}

/// Generated name under which attachment bytes are stored.
///
/// # Examples
/// ```
/// use helpdesk::domain::StorageKey;
///
/// let key = StorageKey::generate(1_718_000_000_000, "C:\\Users\\ada\\q3-report.pdf");
/// assert_eq!(key.as_ref(), "1718000000000-q3-report.pdf");
/// assert_eq!(key.download_name(), "q3-report.pdf");
/// assert_eq!(key.mime_type(), "application/pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Build a key from a millisecond timestamp and the uploaded filename.
    ///
    /// Only the final path component of `original_name` is kept.
    #[must_use]
    pub fn generate(unix_millis: i64, original_name: &str) -> Self {
        let base = sanitise_filename(original_name);
        Self(format!("{unix_millis}-{base}"))
    }

    /// Parse a key received from a client.
    pub fn parse(raw: &str) -> Result<Self, StorageKeyError> {
        if raw.is_empty() {
            return Err(StorageKeyError::Empty);
        }
        if raw.contains(['/', '\\', '\0']) || is_dot_entry(raw) {
            return Err(StorageKeyError::Traversal);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Filename offered to the client: everything after the first `-`.
    #[must_use]
    pub fn download_name(&self) -> &str {
        match self.0.split_once('-') {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.0,
        }
    }

    /// MIME type derived from the key's extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        mime_for_filename(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(value: StorageKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = StorageKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Reduce an uploaded filename to its final component.
///
/// Names that collapse to nothing, `.` or `..` become `file`. Dots inside a
/// name are kept.
#[must_use]
pub fn sanitise_filename(original_name: &str) -> String {
    let last = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .replace('\0', "");
    let trimmed = last.trim();
    if trimmed.is_empty() || is_dot_entry(trimmed) {
        "file".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// Fixed extension to MIME table; anything else is `application/octet-stream`.
#[must_use]
pub fn mime_for_filename(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.JPG", "image/jpeg")]
    #[case("scan.jpeg", "image/jpeg")]
    #[case("a.png", "image/png")]
    #[case("a.gif", "image/gif")]
    #[case("a.pdf", "application/pdf")]
    #[case("a.doc", "application/msword")]
    #[case(
        "a.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    )]
    #[case("notes.txt", "text/plain")]
    #[case("archive.tar.gz", "application/octet-stream")]
    #[case("README", "application/octet-stream")]
    fn mime_table(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_for_filename(name), expected);
    }

    #[rstest]
    #[case("../../etc/passwd", "passwd")]
    #[case("dir\\sub\\file.txt", "file.txt")]
    #[case("..", "file")]
    #[case(" . ", "file")]
    #[case("v1..2.txt", "v1..2.txt")]
    #[case("uploads/..hidden", "..hidden")]
    #[case("", "file")]
    #[case("plain.txt", "plain.txt")]
    fn filenames_reduce_to_final_component(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitise_filename(raw), expected);
    }

    #[rstest]
    fn download_name_drops_only_the_first_token() {
        let key = StorageKey::parse("1700000000000-2024-budget.xlsx").expect("valid key");
        assert_eq!(key.download_name(), "2024-budget.xlsx");
    }

    #[rstest]
    fn download_name_without_hyphen_is_the_key() {
        let key = StorageKey::parse("legacyfile.txt").expect("valid key");
        assert_eq!(key.download_name(), "legacyfile.txt");
    }

    #[rstest]
    #[case("", StorageKeyError::Empty)]
    #[case("../secret", StorageKeyError::Traversal)]
    #[case("a/b.txt", StorageKeyError::Traversal)]
    #[case("a\\b.txt", StorageKeyError::Traversal)]
    #[case("..", StorageKeyError::Traversal)]
    #[case(".", StorageKeyError::Traversal)]
    #[case("1-a\0.txt", StorageKeyError::Traversal)]
    fn parse_rejects_unsafe_keys(#[case] raw: &str, #[case] expected: StorageKeyError) {
        assert_eq!(StorageKey::parse(raw), Err(expected));
    }

    #[rstest]
    #[case("1700000000000-notes..txt", "notes..txt")]
    #[case("1700000000000-v1..2.txt", "v1..2.txt")]
    fn dotted_names_stay_downloadable(#[case] raw: &str, #[case] download: &str) {
        let key = StorageKey::parse(raw).expect("valid key");
        assert_eq!(key.download_name(), download);
    }

    #[rstest]
    fn generated_keys_parse_back() {
        let key = StorageKey::generate(42, "../evil/report.pdf");
        assert_eq!(key.as_ref(), "42-report.pdf");
        assert_eq!(StorageKey::parse(key.as_ref()), Ok(key));
    }
}
