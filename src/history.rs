use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{load_or_default, push_front_unique, store_document, Result};

/// Maximum number of topics kept in the history.
pub const HISTORY_LIMIT: usize = 50;

/// Topics shown before the user has searched anything.
pub const SEED_TOPICS: [&str; 3] = ["Photosynthesis", "Human Anatomy", "Nursing Basics"];

/// Contents of `ai_search_history.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    history: Vec<String>,
}

impl Default for HistoryDocument {
    fn default() -> Self {
        HistoryDocument {
            history: SEED_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Most-recent-first list of AI search topics.
pub struct SearchHistory {
    path: PathBuf,
}

impl SearchHistory {
    pub fn new(data_root: &Path) -> Self {
        Self {
            path: data_root.join("ai_search_history.json"),
        }
    }

    /// Records `topic` at the head of the history unless it is already present.
    ///
    /// Returns whether the history changed. Blank topics are ignored.
    pub fn record_query(&self, topic: &str) -> Result<bool> {
        let topic = topic.trim();
        if topic.is_empty() {
            debug!("Ignoring blank search topic");
            return Ok(false);
        }

        let mut doc: HistoryDocument = load_or_default(&self.path, HistoryDocument::default);
        if !push_front_unique(&mut doc.history, topic, HISTORY_LIMIT) {
            debug!("Topic already in history: {}", topic);
            return Ok(false);
        }

        store_document(&self.path, &doc)?;
        info!("Recorded search topic: {}", topic);
        Ok(true)
    }

    /// Stored topics, newest first.
    pub fn recent_queries(&self) -> Vec<String> {
        load_or_default::<HistoryDocument, _>(&self.path, HistoryDocument::default).history
    }
}
