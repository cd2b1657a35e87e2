//! Error types for the smarta application.
//!
//! Recoverable conditions (missing documents, duplicate names, failed
//! attachment copies) never reach this enum; they are absorbed by the stores.
//! What remains here propagates to the presentation layer.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the smarta application.
#[derive(Error, Debug)]
pub enum SmartaError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A folder or community name that sanitizes to an empty identifier.
    #[error("Invalid name: {name:?} has no usable characters")]
    InvalidName { name: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Note was not found when performing an operation.
    #[error("Note not found: {note} in folder {folder}")]
    NoteNotFound { folder: String, note: String },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}
