use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{load_document, Result, SmartaError};

/// Contents of `config.json`. Read by the application, never written.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ConfigFile {
    openai_api_key: Option<String>,
}

/// Application configuration settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding every store's documents
    pub data_dir: PathBuf,

    /// Key for the remote summarizer, if the user configured one
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Loads `config.json` from `data_dir`. A missing or malformed file
    /// yields a configuration without an API key.
    pub fn load(data_dir: &Path) -> Self {
        let outcome = load_document(&data_dir.join("config.json"), ConfigFile::default);
        debug!("Config file loaded: {}", outcome.is_loaded());
        let file = outcome.into_inner();

        Config {
            data_dir: data_dir.to_path_buf(),
            openai_api_key: file.openai_api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

/// Platform data directory for the application, e.g. `~/.local/share/smarta`.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "smarta")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SmartaError::ConfigError {
            message: "Could not determine a home directory for application data".to_string(),
        })
}
