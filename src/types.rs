//! Core data structures shared across the smarta stores and the CLI.
use std::path::PathBuf;

use clap::Subcommand;

use crate::SmartaError;

/// A specialized Result type for smarta operations.
pub type Result<T> = std::result::Result<T, SmartaError>;

/// Why a document load fell back to its default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// No file exists at the path.
    Missing,
    /// The file exists but could not be read.
    Unreadable,
    /// The file was read but is not valid JSON for the expected shape.
    Malformed,
}

/// Result of reading a document: either the stored value or the caller's default.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Defaulted { value: T, reason: DefaultReason },
}

impl<T> LoadOutcome<T> {
    /// Returns the loaded document or the default, discarding which path was taken.
    pub fn into_inner(self) -> T {
        match self {
            LoadOutcome::Loaded(value) => value,
            LoadOutcome::Defaulted { value, .. } => value,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    /// The fallback reason, or `None` when the document was loaded.
    pub fn reason(&self) -> Option<DefaultReason> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Defaulted { reason, .. } => Some(*reason),
        }
    }
}

/// Available subcommands for the smarta application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List note folders
    Folders,

    /// Create a note folder
    CreateFolder {
        /// Display name of the folder
        name: String,
    },

    /// Rename a note folder
    RenameFolder {
        /// Current folder name
        old: String,

        /// New folder name
        new: String,
    },

    /// List notes in a folder, newest first
    Notes {
        /// Folder to list (defaults to the first folder)
        #[clap(short, long)]
        folder: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Create a new note
    Create {
        /// Folder to save the note in (defaults to the first folder)
        #[clap(short, long)]
        folder: Option<String>,

        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Body of the note
        #[clap(short, long, default_value = "")]
        body: String,
    },

    /// Import a text or markdown file as a new note
    Import {
        /// Path to the file to import
        source: PathBuf,

        /// Folder to import into (defaults to the first folder)
        #[clap(short, long)]
        folder: Option<String>,
    },

    /// View a note
    View {
        /// Note file name (`<id>.json`) or id
        note: String,

        /// Folder holding the note (defaults to the first folder)
        #[clap(short, long)]
        folder: Option<String>,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note in place
    Edit {
        /// Note file name (`<id>.json`) or id
        note: String,

        /// Folder holding the note (defaults to the first folder)
        #[clap(short, long)]
        folder: Option<String>,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New body for the note
        #[clap(short, long)]
        body: Option<String>,
    },

    /// List communities
    Communities,

    /// Create a community
    CreateCommunity {
        /// Display name of the community
        name: String,
    },

    /// Join a community and show its posts and chat
    Join {
        /// Community name
        name: String,
    },

    /// Publish a post to a community
    Post {
        /// Community name
        community: String,

        /// Post text
        #[clap(short, long, default_value = "")]
        text: String,

        /// Local file to attach
        #[clap(short, long)]
        attach: Option<PathBuf>,

        /// Author display name
        #[clap(long, default_value = "You")]
        author: String,
    },

    /// List posts in a community, newest first
    Posts {
        /// Community name
        community: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Send a chat message to a community
    Send {
        /// Community name
        community: String,

        /// Message text
        text: String,

        /// Sender display name
        #[clap(long, default_value = "You")]
        sender: String,
    },

    /// Show a community's chat, oldest first
    Messages {
        /// Community name
        community: String,
    },

    /// Ask the AI assistant about a topic
    Search {
        /// Topic to summarize
        topic: String,
    },

    /// Show recent AI search topics
    History,

    /// Show the active configuration
    Config,
}
