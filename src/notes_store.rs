use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::{
    ensure_dir, load_document, load_or_default, normalize_name, safe_filename, store_document,
    DefaultReason, FolderIndex, LoadOutcome, Note, Result, SmartaError,
};

/// Manages the folder index and the per-folder note documents.
///
/// Layout under the data root:
///
/// ```text
/// notes/metadata.json                      {"folders": [...]}
/// notes/folders/<sanitized>/<id>.json      one Note per file
/// ```
///
/// Only the folder index is held in memory; notes are read from disk on demand.
pub struct NotesStore {
    /// `<data root>/notes`
    base: PathBuf,

    /// Path of the folder index document
    meta_path: PathBuf,

    /// Folder names in insertion order
    index: FolderIndex,
}

impl NotesStore {
    /// Opens the notes store under `data_root`, loading the folder index and
    /// ensuring every indexed folder has a directory.
    pub fn open(data_root: &Path) -> Result<Self> {
        let base = data_root.join("notes");
        ensure_dir(&base)?;

        let meta_path = base.join("metadata.json");
        let index: FolderIndex = load_or_default(&meta_path, FolderIndex::default);
        info!(
            "Opened notes store at {} with {} folders",
            base.display(),
            index.folders.len()
        );

        let store = Self {
            base,
            meta_path,
            index,
        };

        for folder in &store.index.folders {
            match store.folder_path(folder) {
                Ok(path) => ensure_dir(&path)?,
                Err(e) => warn!("Skipping indexed folder {:?}: {}", folder, e),
            }
        }

        Ok(store)
    }

    /// Current folder index, in insertion order.
    pub fn list_folders(&self) -> Vec<String> {
        self.index.folders.clone()
    }

    /// First indexed folder, or the default folder name when the index is empty.
    pub fn first_folder(&self) -> String {
        self.index
            .folders
            .first()
            .cloned()
            .unwrap_or_else(|| crate::DEFAULT_FOLDER.to_string())
    }

    /// Directory backing `folder`. Fails for names with no usable characters.
    pub fn folder_path(&self, folder: &str) -> Result<PathBuf> {
        let id = safe_filename(folder);
        if id.is_empty() {
            return Err(SmartaError::InvalidName {
                name: folder.to_string(),
            });
        }
        Ok(self.base.join("folders").join(id))
    }

    /// Creates a folder. Returns `Ok(false)` if the name, or its on-disk
    /// identifier, is already indexed.
    pub fn create_folder(&mut self, name: &str) -> Result<bool> {
        let name = normalize_name(name);
        let path = self.folder_path(&name)?;

        if self.is_taken(&name, None) {
            info!("Folder already exists: {}", name);
            return Ok(false);
        }

        ensure_dir(&path)?;
        self.index.folders.push(name.clone());
        self.save_index()?;

        info!("Created folder: {}", name);
        Ok(true)
    }

    /// Renames `old` to `new`, keeping its index position and moving its
    /// directory. Returns `Ok(false)` if `old` is not indexed or `new` is taken.
    pub fn rename_folder(&mut self, old: &str, new: &str) -> Result<bool> {
        let new = normalize_name(new);

        let Some(position) = self.index.folders.iter().position(|f| f == old) else {
            info!("Cannot rename missing folder: {}", old);
            return Ok(false);
        };
        if self.index.folders.contains(&new) || self.is_taken(&new, Some(old)) {
            info!("Cannot rename {} to existing folder {}", old, new);
            return Ok(false);
        }

        let new_path = self.folder_path(&new)?;
        match self.folder_path(old) {
            Ok(old_path) if old_path.is_dir() => {
                if old_path != new_path {
                    debug!(
                        "Moving folder directory {} -> {}",
                        old_path.display(),
                        new_path.display()
                    );
                    fs::rename(&old_path, &new_path).map_err(|e| {
                        error!("Failed to move folder {}: {}", old_path.display(), e);
                        SmartaError::Io(e)
                    })?;
                }
            }
            _ => ensure_dir(&new_path)?,
        }

        self.index.folders[position] = new.clone();
        self.save_index()?;

        info!("Renamed folder {} to {}", old, new);
        Ok(true)
    }

    /// Note file names in `folder`, newest first.
    pub fn list_notes(&self, folder: &str) -> Result<Vec<String>> {
        let folder_path = self.folder_path(folder)?;
        ensure_dir(&folder_path)?;

        let mut notes: Vec<String> = WalkDir::new(&folder_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "json")
            })
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();

        // Ids are timestamps, so descending name order is newest first
        notes.sort_unstable_by(|a, b| b.cmp(a));
        debug!("Found {} notes in folder {}", notes.len(), folder);
        Ok(notes)
    }

    /// Saves a new note in `folder` and returns the path of its document.
    pub fn save_note(&self, folder: &str, title: &str, body: &str) -> Result<PathBuf> {
        let note = Note::new(title.to_string(), body.to_string());
        let path = self.folder_path(folder)?.join(note.file_name());

        store_document(&path, &note)?;
        info!("Saved note {} in folder {}", note.id, folder);
        Ok(path)
    }

    /// Loads a note by file name (`<id>.json`) or bare id.
    ///
    /// A missing or corrupt note yields an empty [`Note`].
    pub fn load_note(&self, folder: &str, note: &str) -> LoadOutcome<Note> {
        match self.note_path(folder, note) {
            Some(path) => load_document(&path, Note::default),
            None => LoadOutcome::Defaulted {
                value: Note::default(),
                reason: DefaultReason::Missing,
            },
        }
    }

    /// Rewrites an existing note in place under its current id.
    ///
    /// The note's document must already exist; editing never creates a note.
    pub fn update_note(&self, folder: &str, note: &Note) -> Result<PathBuf> {
        if note.id.contains(['/', '\\']) || note.id == "." || note.id == ".." {
            return Err(SmartaError::InvalidName {
                name: note.id.clone(),
            });
        }

        let path = self
            .note_path(folder, &note.id)
            .filter(|path| path.is_file())
            .ok_or_else(|| SmartaError::NoteNotFound {
                folder: folder.to_string(),
                note: note.id.clone(),
            })?;

        store_document(&path, note)?;
        info!("Updated note {} in folder {}", note.id, folder);
        Ok(path)
    }

    /// Imports a text file as a new note titled with the file's name.
    ///
    /// Content that cannot be read as UTF-8 text becomes an empty body.
    pub fn import_note(&self, folder: &str, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(SmartaError::FileNotFound {
                file_path: source.display().to_string(),
            });
        }

        let title = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = fs::read_to_string(source).unwrap_or_else(|e| {
            warn!("Failed to read import source {}: {}", source.display(), e);
            String::new()
        });

        self.save_note(folder, &title, &body)
    }

    fn note_path(&self, folder: &str, note: &str) -> Option<PathBuf> {
        let folder_path = self.folder_path(folder).ok()?;
        let file_name = Path::new(note).file_name()?.to_string_lossy().into_owned();
        if file_name.ends_with(".json") {
            Some(folder_path.join(file_name))
        } else {
            Some(folder_path.join(format!("{}.json", file_name)))
        }
    }

    fn is_taken(&self, name: &str, except: Option<&str>) -> bool {
        let id = safe_filename(name);
        self.index
            .folders
            .iter()
            .filter(|f| Some(f.as_str()) != except)
            .any(|f| f == name || safe_filename(f) == id)
    }

    fn save_index(&self) -> Result<()> {
        store_document(&self.meta_path, &self.index)
    }
}
