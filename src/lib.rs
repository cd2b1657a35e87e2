//! Smarta application library
//!
//! Local, per-user persistence for notes, community boards and AI search
//! history, stored as small JSON documents under one data directory.

mod cli;
mod community;
mod config;
mod context;
mod document;
mod errors;
mod helper;
mod history;
mod note;
mod notes_store;
mod types;

// Re-export key components
pub use cli::*;
pub use community::*;
pub use config::*;
pub use context::*;
pub use document::*;
pub use errors::*;
pub use helper::*;
pub use history::*;
pub use note::*;
pub use notes_store::*;
pub use types::*;
