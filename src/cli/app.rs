//! CLI module for the smarta application
//!
//! Each subcommand maps onto one store operation and renders its result.
use std::path::Path;

use console::style;
use log::{debug, info};

use crate::{AppContext, Commands, LoadOutcome, Message, Note, Post, Result, SmartaError};

/// Longest body excerpt shown in note listings.
const SNIPPET_LEN: usize = 120;

/// CLI Application handler - processes CLI commands against the stores
pub struct App {
    context: AppContext,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    pub fn new(context: AppContext, verbose: bool) -> Self {
        Self { context, verbose }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        debug!("Running command: {:?}", command);
        match command {
            Commands::Folders => self.list_folders(),
            Commands::CreateFolder { name } => self.create_folder(&name)?,
            Commands::RenameFolder { old, new } => self.rename_folder(&old, &new)?,
            Commands::Notes { folder, json } => self.list_notes(folder, json)?,
            Commands::Create {
                folder,
                title,
                body,
            } => {
                let folder = self.folder_or_first(folder);
                let path = self.context.notes.save_note(&folder, &title, &body)?;
                println!("Note saved: {}", path.display());
            }
            Commands::Import { source, folder } => self.import_note(&source, folder)?,
            Commands::View { note, folder, json } => self.view_note(&note, folder, json)?,
            Commands::Edit {
                note,
                folder,
                title,
                body,
            } => self.edit_note(&note, folder, title, body)?,
            Commands::Communities => self.list_communities(),
            Commands::CreateCommunity { name } => self.create_community(&name)?,
            Commands::Join { name } => {
                self.context.communities.join_community(&name)?;
                println!("Joined {}", style(&name).bold());
                self.show_posts(&name, false)?;
                self.show_messages(&name)?;
            }
            Commands::Post {
                community,
                text,
                attach,
                author,
            } => self.add_post(&community, &author, &text, attach.as_deref())?,
            Commands::Posts { community, json } => self.show_posts(&community, json)?,
            Commands::Send {
                community,
                text,
                sender,
            } => self.send_message(&community, &sender, &text)?,
            Commands::Messages { community } => self.show_messages(&community)?,
            Commands::Search { topic } => self.search(&topic)?,
            Commands::History => {
                for topic in self.context.history.recent_queries() {
                    println!("{}", topic);
                }
            }
            Commands::Config => {
                let config = &self.context.config;
                println!("Data directory: {}", config.data_dir.display());
                println!(
                    "AI key configured: {}",
                    if config.has_api_key() { "yes" } else { "no" }
                );
            }
        }

        Ok(())
    }

    fn folder_or_first(&self, folder: Option<String>) -> String {
        folder.unwrap_or_else(|| self.context.notes.first_folder())
    }

    fn list_folders(&self) {
        for folder in self.context.notes.list_folders() {
            println!("{}", folder);
        }
    }

    fn create_folder(&mut self, name: &str) -> Result<()> {
        if self.context.notes.create_folder(name)? {
            println!("Folder '{}' created", name.trim());
        } else {
            println!("Folder exists or invalid");
        }
        Ok(())
    }

    fn rename_folder(&mut self, old: &str, new: &str) -> Result<()> {
        if self.context.notes.rename_folder(old, new)? {
            println!("Folder renamed");
        } else {
            println!("Rename failed or name exists");
        }
        Ok(())
    }

    fn list_notes(&self, folder: Option<String>, json: bool) -> Result<()> {
        let folder = self.folder_or_first(folder);
        let files = self.context.notes.list_notes(&folder)?;

        if json {
            let notes: Vec<Note> = files
                .iter()
                .map(|file| self.context.notes.load_note(&folder, file).into_inner())
                .collect();
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        println!("Folder: {}", style(&folder).bold());
        if files.is_empty() {
            println!("No notes in this folder yet.");
            return Ok(());
        }

        for file in files {
            let note = self.context.notes.load_note(&folder, &file).into_inner();
            println!("{}  {}", style(&file).dim(), style(note_heading(&note, &file)).bold());
            let snippet: String = note.body.chars().take(SNIPPET_LEN).collect();
            if !snippet.is_empty() {
                println!("    {}", snippet.replace('\n', " "));
            }
        }
        Ok(())
    }

    fn import_note(&self, source: &Path, folder: Option<String>) -> Result<()> {
        let folder = self.folder_or_first(folder);
        let path = self.context.notes.import_note(&folder, source)?;
        info!("Imported {} as {}", source.display(), path.display());
        println!(
            "Imported {}",
            source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        Ok(())
    }

    fn view_note(&self, note: &str, folder: Option<String>, json: bool) -> Result<()> {
        let folder = self.folder_or_first(folder);
        let loaded = self.loaded_note(&folder, note)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&loaded)?);
            return Ok(());
        }

        println!("{}", style(note_heading(&loaded, note)).bold());
        if let Some(created) = loaded.created {
            println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("\n{}", loaded.body);
        Ok(())
    }

    fn edit_note(
        &self,
        note: &str,
        folder: Option<String>,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<()> {
        let folder = self.folder_or_first(folder);
        let mut loaded = self.loaded_note(&folder, note)?;

        if let Some(title) = title {
            loaded.title = title;
        }
        if let Some(body) = body {
            loaded.body = body;
        }

        self.context.notes.update_note(&folder, &loaded)?;
        println!("Note {} updated", loaded.id);
        Ok(())
    }

    fn loaded_note(&self, folder: &str, note: &str) -> Result<Note> {
        match self.context.notes.load_note(folder, note) {
            LoadOutcome::Loaded(loaded) if !loaded.id.is_empty() => Ok(loaded),
            outcome => {
                debug!("Note {} unavailable: {:?}", note, outcome.reason());
                Err(SmartaError::NoteNotFound {
                    folder: folder.to_string(),
                    note: note.to_string(),
                })
            }
        }
    }

    fn list_communities(&self) {
        let communities = self.context.communities.list_communities();
        if communities.is_empty() {
            println!("No communities yet. Create one with create-community");
            return;
        }
        for community in communities {
            println!("{}", community);
        }
    }

    fn create_community(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            println!("Enter a name");
            return Ok(());
        }
        if self.context.communities.create_community(name)? {
            println!("{} created", name.trim());
        } else {
            println!("Already exists");
        }
        Ok(())
    }

    fn add_post(
        &self,
        community: &str,
        author: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<()> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            println!("Add text or attachment");
            return Ok(());
        }

        let post = self
            .context
            .communities
            .add_post(community, author, text, attachment)?;
        if attachment.is_some() && post.attachment.is_none() {
            println!("Attachment could not be copied; posted without it");
        }
        println!("Posted");
        Ok(())
    }

    fn show_posts(&self, community: &str, json: bool) -> Result<()> {
        let posts = self.context.communities.list_posts(community)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&posts)?);
            return Ok(());
        }

        if posts.is_empty() {
            println!("No posts yet");
        }
        for post in &posts {
            print_post(post, self.verbose);
        }
        Ok(())
    }

    fn send_message(&self, community: &str, sender: &str, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.context
            .communities
            .add_message(community, sender, text)?;
        println!("Message sent");
        Ok(())
    }

    fn show_messages(&self, community: &str) -> Result<()> {
        println!("{}", style("Community Chat").bold());
        for message in self.context.communities.list_messages(community)? {
            print_message(&message);
        }
        Ok(())
    }

    fn search(&self, topic: &str) -> Result<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            println!("Type a query");
            return Ok(());
        }

        self.context.history.record_query(topic)?;
        println!("Summary for: {}\n(Placeholder)", style(topic).bold());
        if self.context.config.has_api_key() {
            println!("AI key found, but remote summaries are not available in this build");
        }
        Ok(())
    }
}

fn note_heading(note: &Note, fallback: &str) -> String {
    if !note.title.is_empty() {
        note.title.clone()
    } else if let Some(created) = note.created {
        created.to_rfc3339()
    } else {
        fallback.to_string()
    }
}

fn print_post(post: &Post, verbose: bool) {
    println!(
        "{} • {}",
        style(&post.author).cyan(),
        post.created.format("%Y-%m-%d %H:%M:%S")
    );
    if post.text.is_empty() {
        println!("  (no text)");
    } else {
        println!("  {}", post.text);
    }
    if let Some(attachment) = &post.attachment {
        if verbose {
            println!("  Attachment: {}", attachment.display());
        } else if let Some(name) = attachment.file_name() {
            println!("  Attachment: {}", name.to_string_lossy());
        }
    }
}

fn print_message(message: &Message) {
    println!("{}: {}", style(&message.sender).cyan(), message.text);
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::Config;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let context = AppContext::open(Config::load(dir.path())).unwrap();
        (dir, App::new(context, false))
    }

    #[test]
    fn create_then_edit_note_through_commands() {
        let (_dir, mut app) = app();
        app.run(Commands::CreateFolder { name: "Work".into() }).unwrap();
        app.run(Commands::Create {
            folder: Some("Work".into()),
            title: "Plan".into(),
            body: "Draft".into(),
        })
        .unwrap();

        let file = app.context().notes.list_notes("Work").unwrap().remove(0);
        app.run(Commands::Edit {
            note: file.clone(),
            folder: Some("Work".into()),
            title: None,
            body: Some("Final".into()),
        })
        .unwrap();

        let note = app.context().notes.load_note("Work", &file).into_inner();
        assert_eq!(note.title, "Plan");
        assert_eq!(note.body, "Final");
    }

    #[test]
    fn editing_missing_note_is_an_error() {
        let (_dir, mut app) = app();
        let err = app
            .run(Commands::Edit {
                note: "nope.json".into(),
                folder: None,
                title: Some("x".into()),
                body: None,
            })
            .unwrap_err();
        assert!(matches!(err, SmartaError::NoteNotFound { .. }));
        assert!(app.context().notes.list_notes("Default").unwrap().is_empty());
    }

    #[test]
    fn empty_post_is_not_published() {
        let (_dir, mut app) = app();
        app.run(Commands::CreateCommunity { name: "C".into() }).unwrap();
        app.run(Commands::Post {
            community: "C".into(),
            text: "   ".into(),
            attach: None,
            author: "You".into(),
        })
        .unwrap();
        assert!(app.context().communities.list_posts("C").unwrap().is_empty());
    }

    #[test]
    fn search_records_history() {
        let (dir, mut app) = app();
        app.run(Commands::Search { topic: " Enzymes ".into() }).unwrap();

        assert_eq!(app.context().history.recent_queries()[0], "Enzymes");
        assert!(fs::metadata(dir.path().join("ai_search_history.json")).is_ok());
    }
}
