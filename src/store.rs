//! Session persistence: the four-key store behind the editor.
//!
//! The browser build persists to local storage; the native build keeps
//! the same shape in one JSON file. There is no schema beyond four string
//! keys (markdown, theme, font, title), read at session start and written
//! after every change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Document;

/// The persisted session: exactly four string keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub markdown: String,
    pub theme: String,
    pub font: String,
    pub title: String,
}

impl Session {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            markdown: doc.markdown().to_string(),
            theme: doc.theme_id.clone(),
            font: doc.font_id.clone(),
            title: doc.title.clone(),
        }
    }

    pub fn into_document(self) -> Document {
        let mut doc = Document::new(self.markdown);
        doc.theme_id = self.theme;
        doc.font_id = self.font;
        doc.title = self.title;
        doc
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_document(&Document::default())
    }
}

/// File-backed key-value store for one session.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session; an absent or unreadable file falls
    /// back to the built-in starter template rather than erroring.
    pub fn load_or_default(&self) -> Session {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Persist the session. Called after every mutation.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("session.json"));

        let mut doc = Document::new("# mine");
        doc.title = "Custom".to_string();
        doc.theme_id = "midnight".to_string();
        store.save(&Session::from_document(&doc)).unwrap();

        let loaded = store.load_or_default().into_document();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn missing_file_yields_starter_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("absent.json"));
        let session = store.load_or_default();
        assert_eq!(session, Session::default());
        assert!(session.markdown.contains("---"));
    }

    #[test]
    fn corrupt_file_yields_starter_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Store::new(path).load_or_default(), Session::default());
    }
}
