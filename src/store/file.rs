//! File primitives for the JSON data file.
//!
//! Creating the default file and reading it are separate steps so each can be
//! exercised on its own; [`Store`](super::Store) composes them.
use std::path::Path;

use thiserror::Error;

use super::StoreDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in store file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Writes `default` to `path` unless something already exists there.
///
/// Returns `true` when the file was created. Parent directories are not
/// created; a missing directory surfaces as [`StoreError::Io`].
pub fn ensure_default_exists(path: &Path, default: &StoreDocument) -> Result<bool, StoreError> {
    if path.exists() {
        return Ok(false);
    }

    write_document(path, default)?;
    tracing::info!(path = %path.display(), "Created store file with default document");
    Ok(true)
}

/// Reads and parses the data file.
pub fn read_document(path: &Path) -> Result<StoreDocument, StoreError> {
    let content = std::fs::read_to_string(path)?;
    let doc: StoreDocument = serde_json::from_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        feeds = doc.feeds.len(),
        endpoints = doc.endpoints.len(),
        "Loaded store file"
    );
    Ok(doc)
}

/// Serializes `doc` with 2-space indentation and overwrites `path`.
///
/// The write is not atomic: a crash mid-write can leave a truncated file.
pub fn write_document(path: &Path, doc: &StoreDocument) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), feeds = doc.feeds.len(), "Saved store file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FeedRecord, Subscribers};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("feedbox_file_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_ensure_default_creates_missing_file() {
        let dir = scratch_dir("create");
        let path = dir.join("data.json");

        let created = ensure_default_exists(&path, &StoreDocument::default()).unwrap();
        assert!(created);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"rsshub_endpoints\": []\n}");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ensure_default_leaves_existing_file() {
        let dir = scratch_dir("existing");
        let path = dir.join("data.json");
        std::fs::write(&path, "not even json").unwrap();

        let created = ensure_default_exists(&path, &StoreDocument::default()).unwrap();
        assert!(!created);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not even json");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ensure_default_missing_directory_is_io_error() {
        let dir = scratch_dir("nodir");
        let path = dir.join("missing").join("data.json");

        let err = ensure_default_exists(&path, &StoreDocument::default()).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = scratch_dir("read_missing");
        let err = read_document(&dir.join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_invalid_json_is_parse_error() {
        let dir = scratch_dir("read_invalid");
        let path = dir.join("data.json");
        std::fs::write(&path, "{\"rsshub_endpoints\": [").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert!(err.to_string().contains("Invalid JSON"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_keeps_non_ascii_literal() {
        let dir = scratch_dir("non_ascii");
        let path = dir.join("data.json");

        let mut doc = StoreDocument::default();
        let mut record =
            FeedRecord::with_subscribers(Subscribers::List(vec![serde_json::json!("群聊:12345")]));
        record
            .extra
            .insert("title".to_string(), serde_json::json!("少数派"));
        doc.feeds.insert("https://sspai.com/feed".to_string(), record);

        write_document(&path, &doc).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("群聊:12345"));
        assert!(content.contains("少数派"));
        assert!(!content.contains("\\u"));

        assert_eq!(read_document(&path).unwrap(), doc);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_overwrites_unconditionally() {
        let dir = scratch_dir("overwrite");
        let path = dir.join("data.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        write_document(&path, &StoreDocument::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"rsshub_endpoints\": []\n}"
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
