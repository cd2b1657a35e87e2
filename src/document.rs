//! JSON document primitive shared by every store.
//!
//! Reads never fail: a missing, unreadable or malformed file yields the
//! caller's default, tagged with the reason. Writes create parent directories
//! and overwrite the target in place.
use std::{fs, io::ErrorKind, path::Path};

use log::{debug, error, trace, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::{DefaultReason, LoadOutcome, Result, SmartaError};

/// Loads the document at `path`, falling back to `default` on any failure.
pub fn load_document<T, F>(path: &Path, default: F) -> LoadOutcome<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Document missing, using default: {}", path.display());
            return LoadOutcome::Defaulted {
                value: default(),
                reason: DefaultReason::Missing,
            };
        }
        Err(e) => {
            warn!("Failed to read document {}: {}", path.display(), e);
            return LoadOutcome::Defaulted {
                value: default(),
                reason: DefaultReason::Unreadable,
            };
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => {
            trace!("Loaded document: {}", path.display());
            LoadOutcome::Loaded(value)
        }
        Err(e) => {
            warn!("Malformed document {}: {}", path.display(), e);
            LoadOutcome::Defaulted {
                value: default(),
                reason: DefaultReason::Malformed,
            }
        }
    }
}

/// Convenience wrapper over [`load_document`] that discards the outcome tag.
pub fn load_or_default<T, F>(path: &Path, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    load_document(path, default).into_inner()
}

/// Serializes `document` as 2-space indented JSON to `path`, overwriting it.
///
/// Missing parent directories are created first. The write is a plain
/// overwrite; an interrupted write can leave a truncated file, which
/// [`load_document`] reports as `Malformed`.
pub fn store_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    trace!("Serializing document to JSON");
    let json = serde_json::to_string_pretty(document).map_err(|e| {
        error!("Failed to serialize document {}: {}", path.display(), e);
        SmartaError::Serialization(e)
    })?;

    fs::write(path, json).map_err(|e| {
        error!("Failed to write document {}: {}", path.display(), e);
        SmartaError::Io(e)
    })?;

    debug!("Stored document: {}", path.display());
    Ok(())
}

/// Creates `path` and all missing ancestors.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    debug!("Creating directory: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed to create directory {}: {}", path.display(), e);
        SmartaError::DirectoryError {
            path: path.to_path_buf(),
        }
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        items: Vec<String>,
    }

    #[test]
    fn missing_document_yields_default() {
        let dir = TempDir::new().unwrap();
        let outcome = load_document(&dir.path().join("absent.json"), || Doc {
            items: vec!["seed".into()],
        });

        assert_eq!(outcome.reason(), Some(DefaultReason::Missing));
        assert_eq!(outcome.into_inner().items, vec!["seed"]);
    }

    #[test]
    fn malformed_document_yields_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"items\": [\"trunc").unwrap();

        let outcome = load_document(&path, Doc::default);
        assert_eq!(outcome.reason(), Some(DefaultReason::Malformed));
        assert!(outcome.into_inner().items.is_empty());
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actually_a_dir.json");
        fs::create_dir(&path).unwrap();

        let outcome = load_document(&path, Doc::default);
        assert_eq!(outcome.reason(), Some(DefaultReason::Unreadable));
    }

    #[test]
    fn store_creates_parents_and_indents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("doc.json");
        let doc = Doc {
            items: vec!["x".into()],
        };

        store_document(&path, &doc).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"items\""));
        let outcome = load_document(&path, Doc::default);
        assert!(outcome.is_loaded());
        assert_eq!(outcome.into_inner(), doc);
    }

    #[test]
    fn store_overwrites_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        store_document(&path, &Doc { items: vec!["old".into(), "older".into()] }).unwrap();
        store_document(&path, &Doc { items: vec!["new".into()] }).unwrap();

        let doc: Doc = load_or_default(&path, Doc::default);
        assert_eq!(doc.items, vec!["new"]);
    }
}
