//! Community spaces: an index of names plus, per community, a post list,
//! a chat log and an attachments directory.
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    ensure_dir, load_or_default, normalize_name, safe_filename, store_document, timestamp_id,
    Result, SmartaError,
};

/// A post on a community board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub text: String,
    /// Absolute path of the copied attachment, if the copy succeeded
    pub attachment: Option<PathBuf>,
    #[serde(deserialize_with = "crate::deserialize_timestamp")]
    pub created: DateTime<Utc>,
}

/// A chat message in a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub text: String,
    #[serde(deserialize_with = "crate::deserialize_timestamp")]
    pub created: DateTime<Utc>,
}

/// Contents of `communities/index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityIndex {
    #[serde(default)]
    pub communities: Vec<String>,
}

/// Newest-first post list document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PostList {
    #[serde(default)]
    posts: Vec<Post>,
}

/// Oldest-first message list document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<Message>,
}

/// Manages the community index and each community's documents.
pub struct CommunityStore {
    /// `<data root>/communities`
    base: PathBuf,

    index_path: PathBuf,

    index: CommunityIndex,
}

impl CommunityStore {
    /// Opens the community store under `data_root`.
    pub fn open(data_root: &Path) -> Result<Self> {
        let base = data_root.join("communities");
        ensure_dir(&base)?;

        let index_path = base.join("index.json");
        let index: CommunityIndex = load_or_default(&index_path, CommunityIndex::default);
        info!(
            "Opened community store at {} with {} communities",
            base.display(),
            index.communities.len()
        );

        Ok(Self {
            base,
            index_path,
            index,
        })
    }

    pub fn list_communities(&self) -> Vec<String> {
        self.index.communities.clone()
    }

    /// Creates a community with empty post and message lists.
    ///
    /// Returns `Ok(false)` if the name, or its on-disk identifier, is already indexed.
    pub fn create_community(&mut self, name: &str) -> Result<bool> {
        let name = normalize_name(name);
        let dir = self.community_path(&name)?;

        let id = safe_filename(&name);
        if self
            .index
            .communities
            .iter()
            .any(|c| *c == name || safe_filename(c) == id)
        {
            info!("Community already exists: {}", name);
            return Ok(false);
        }

        ensure_dir(&dir)?;
        store_document(&dir.join("posts.json"), &PostList::default())?;
        store_document(&dir.join("messages.json"), &MessageList::default())?;

        self.index.communities.push(name.clone());
        store_document(&self.index_path, &self.index)?;

        info!("Created community: {}", name);
        Ok(true)
    }

    /// Makes sure the community's directory exists locally.
    pub fn join_community(&self, name: &str) -> Result<PathBuf> {
        let dir = self.community_path(name)?;
        ensure_dir(&dir)?;
        info!("Joined community: {}", name);
        Ok(dir)
    }

    /// Directory backing `name`. Fails for names with no usable characters.
    pub fn community_path(&self, name: &str) -> Result<PathBuf> {
        let id = safe_filename(name);
        if id.is_empty() {
            return Err(SmartaError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.base.join(id))
    }

    /// Attachments directory of `name`, created if absent.
    pub fn attachments_path(&self, name: &str) -> Result<PathBuf> {
        let dir = self.community_path(name)?.join("attachments");
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Adds a post at the head of the community's post list.
    ///
    /// When `attachment_source` is given it is copied into the attachments
    /// directory as `<post id>_<basename>`. A failed copy still creates the
    /// post, just without an attachment.
    pub fn add_post(
        &self,
        community: &str,
        author: &str,
        text: &str,
        attachment_source: Option<&Path>,
    ) -> Result<Post> {
        let posts_path = self.posts_path(community)?;
        let mut list: PostList = load_or_default(&posts_path, PostList::default);

        let now = Utc::now();
        let id = timestamp_id(&now);
        let attachment =
            attachment_source.and_then(|source| self.copy_attachment(community, &id, source));

        let post = Post {
            id,
            author: author.to_string(),
            text: text.to_string(),
            attachment,
            created: now,
        };
        list.posts.insert(0, post.clone());
        store_document(&posts_path, &list)?;

        info!("Added post {} to community {}", post.id, community);
        Ok(post)
    }

    /// Posts in stored order, newest first.
    pub fn list_posts(&self, community: &str) -> Result<Vec<Post>> {
        let list: PostList = load_or_default(&self.posts_path(community)?, PostList::default);
        Ok(list.posts)
    }

    /// Appends a chat message to the community's message log.
    pub fn add_message(&self, community: &str, sender: &str, text: &str) -> Result<Message> {
        let messages_path = self.messages_path(community)?;
        let mut list: MessageList = load_or_default(&messages_path, MessageList::default);

        let message = Message {
            sender: sender.to_string(),
            text: text.to_string(),
            created: Utc::now(),
        };
        list.messages.push(message.clone());
        store_document(&messages_path, &list)?;

        debug!("Added message from {} to community {}", sender, community);
        Ok(message)
    }

    /// Messages in stored order, oldest first.
    pub fn list_messages(&self, community: &str) -> Result<Vec<Message>> {
        let list: MessageList =
            load_or_default(&self.messages_path(community)?, MessageList::default);
        Ok(list.messages)
    }

    fn posts_path(&self, community: &str) -> Result<PathBuf> {
        Ok(self.community_path(community)?.join("posts.json"))
    }

    fn messages_path(&self, community: &str) -> Result<PathBuf> {
        Ok(self.community_path(community)?.join("messages.json"))
    }

    fn copy_attachment(&self, community: &str, post_id: &str, source: &Path) -> Option<PathBuf> {
        let Some(base_name) = source.file_name() else {
            warn!("Attachment source has no file name: {}", source.display());
            return None;
        };

        let dir = match self.attachments_path(community) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Attachment directory unavailable for {}: {}", community, e);
                return None;
            }
        };
        let dest = dir.join(format!("{}_{}", post_id, base_name.to_string_lossy()));

        match fs::copy(source, &dest) {
            Ok(bytes) => {
                debug!("Copied {} bytes to {}", bytes, dest.display());
                Some(fs::canonicalize(&dest).unwrap_or(dest))
            }
            Err(e) => {
                warn!("Failed to copy attachment {}: {}", source.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open_store() -> (TempDir, CommunityStore) {
        let dir = TempDir::new().unwrap();
        let store = CommunityStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_community_writes_empty_documents() {
        let (dir, mut store) = open_store();
        assert!(store.create_community("Nursing").unwrap());

        let root = dir.path().join("communities");
        assert!(root.join("index.json").is_file());
        assert!(root.join("Nursing/posts.json").is_file());
        assert!(root.join("Nursing/messages.json").is_file());
        assert_eq!(store.list_communities(), vec!["Nursing"]);
        assert!(store.list_posts("Nursing").unwrap().is_empty());
        assert!(store.list_messages("Nursing").unwrap().is_empty());
    }

    #[test]
    fn duplicate_community_is_rejected() {
        let (_dir, mut store) = open_store();
        assert!(store.create_community("Biology").unwrap());
        assert!(!store.create_community("Biology").unwrap());
        assert!(!store.create_community("Biology!").unwrap());
        assert_eq!(store.list_communities(), vec!["Biology"]);
    }

    #[test]
    fn invalid_community_name_is_an_error() {
        let (_dir, mut store) = open_store();
        let err = store.create_community("***").unwrap_err();
        assert!(matches!(err, SmartaError::InvalidName { .. }));
        assert!(store.list_communities().is_empty());
    }

    #[test]
    fn index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = CommunityStore::open(dir.path()).unwrap();
            store.create_community("One").unwrap();
            store.create_community("Two").unwrap();
        }
        let store = CommunityStore::open(dir.path()).unwrap();
        assert_eq!(store.list_communities(), vec!["One", "Two"]);
    }

    #[test]
    fn posts_are_newest_first() {
        let (_dir, mut store) = open_store();
        store.create_community("C").unwrap();
        for text in ["P1", "P2", "P3"] {
            store.add_post("C", "You", text, None).unwrap();
        }

        let texts: Vec<String> = store
            .list_posts("C")
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["P3", "P2", "P1"]);
    }

    #[test]
    fn messages_are_oldest_first() {
        let (_dir, mut store) = open_store();
        store.create_community("C").unwrap();
        for text in ["M1", "M2", "M3"] {
            store.add_message("C", "You", text).unwrap();
        }

        let texts: Vec<String> = store
            .list_messages("C")
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn post_without_attachment_serializes_null() {
        let (dir, mut store) = open_store();
        store.create_community("C").unwrap();
        let post = store.add_post("C", "You", "hello", None).unwrap();
        assert!(post.attachment.is_none());

        let raw = fs::read_to_string(dir.path().join("communities/C/posts.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(doc["posts"][0]["attachment"].is_null());
        assert_eq!(doc["posts"][0]["author"], "You");
    }

    #[test]
    fn attachment_is_copied_byte_for_byte() {
        let (dir, mut store) = open_store();
        store.create_community("C").unwrap();
        let source = dir.path().join("slides.pdf");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fs::write(&source, &bytes).unwrap();

        let post = store.add_post("C", "You", "", Some(&source)).unwrap();

        let attachment = post.attachment.expect("attachment recorded");
        assert!(attachment.is_absolute());
        assert_eq!(fs::read(&attachment).unwrap(), bytes);
        let name = attachment.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("{}_slides.pdf", post.id));
        assert!(fs::canonicalize(&attachment)
            .unwrap()
            .starts_with(fs::canonicalize(dir.path().join("communities/C/attachments")).unwrap()));
    }

    #[test]
    fn failed_attachment_copy_still_creates_post() {
        let (dir, mut store) = open_store();
        store.create_community("C").unwrap();

        let post = store
            .add_post("C", "You", "text", Some(&dir.path().join("missing.png")))
            .unwrap();

        assert!(post.attachment.is_none());
        assert_eq!(store.list_posts("C").unwrap(), vec![post]);
    }

    #[test]
    fn corrupt_post_list_is_treated_as_empty() {
        let (dir, mut store) = open_store();
        store.create_community("C").unwrap();
        fs::write(dir.path().join("communities/C/posts.json"), "not json").unwrap();

        assert!(store.list_posts("C").unwrap().is_empty());
        store.add_post("C", "You", "fresh", None).unwrap();
        assert_eq!(store.list_posts("C").unwrap().len(), 1);
    }

    #[test]
    fn naive_timestamps_are_kept_when_adding() {
        let (dir, mut store) = open_store();
        store.create_community("C").unwrap();
        let community = dir.path().join("communities/C");
        fs::write(
            community.join("posts.json"),
            r#"{"posts": [{"id": "20240309070501000042", "author": "You", "text": "old", "attachment": null, "created": "2024-03-09T07:05:01.000042"}]}"#,
        )
        .unwrap();
        fs::write(
            community.join("messages.json"),
            r#"{"messages": [{"sender": "Ana", "text": "hi", "created": "2024-03-09T07:05:01"}]}"#,
        )
        .unwrap();

        assert_eq!(store.list_posts("C").unwrap().len(), 1);
        store.add_post("C", "You", "new", None).unwrap();
        store.add_message("C", "You", "hello").unwrap();

        let texts: Vec<String> = store
            .list_posts("C")
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["new", "old"]);
        let senders: Vec<String> = store
            .list_messages("C")
            .unwrap()
            .into_iter()
            .map(|m| m.sender)
            .collect();
        assert_eq!(senders, vec!["Ana", "You"]);
    }

    #[test]
    fn join_creates_directory() {
        let (dir, store) = open_store();
        let path = store.join_community("Visitors").unwrap();
        assert!(path.is_dir());
        assert_eq!(path, dir.path().join("communities/Visitors"));
    }
}
