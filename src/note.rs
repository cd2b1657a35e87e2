//! Records persisted by the notes store.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp_id;

/// A single note document, stored as `<id>.json` inside its folder directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Compact timestamp id, also the file stem
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// When the note was created. `None` only for the empty placeholder note.
    #[serde(default, deserialize_with = "crate::deserialize_optional_timestamp")]
    pub created: Option<DateTime<Utc>>,
}

impl Note {
    /// Creates a new note stamped with the current time
    pub fn new(title: String, body: String) -> Self {
        let now = Utc::now();
        Note {
            id: timestamp_id(&now),
            title,
            body,
            created: Some(now),
        }
    }

    /// File name of the note document
    pub fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }

    /// True for the placeholder returned when a note could not be loaded.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.title.is_empty() && self.body.is_empty()
    }
}

/// Contents of `notes/metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderIndex {
    #[serde(default)]
    pub folders: Vec<String>,
}

impl Default for FolderIndex {
    fn default() -> Self {
        FolderIndex {
            folders: vec![DEFAULT_FOLDER.to_string()],
        }
    }
}

/// Folder present on first run.
pub const DEFAULT_FOLDER: &str = "Default";
