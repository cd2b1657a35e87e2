use log::info;

use crate::{ensure_dir, CommunityStore, Config, NotesStore, Result, SearchHistory};

/// Every store the presentation layer needs, built from one [`Config`].
pub struct AppContext {
    pub config: Config,
    pub notes: NotesStore,
    pub communities: CommunityStore,
    pub history: SearchHistory,
}

impl AppContext {
    /// Opens all stores under the configured data root, creating it if needed.
    pub fn open(config: Config) -> Result<Self> {
        ensure_dir(&config.data_dir)?;
        info!("Opening application data at {}", config.data_dir.display());

        let notes = NotesStore::open(&config.data_dir)?;
        let communities = CommunityStore::open(&config.data_dir)?;
        let history = SearchHistory::new(&config.data_dir);

        Ok(Self {
            config,
            notes,
            communities,
            history,
        })
    }
}
