//! Navigation history for the editor.
//!
//! Mirrors browser session history: `push` adds an entry and drops any
//! forward entries; `back`/`forward` move the cursor and announce the target
//! document on the editor event channel.

use tracing::debug;
use url::Url;

use crate::editor::{EditorEvent, EventSender};

/// Path of the editor page.
pub const EDITOR_PATH: &str = "/editor";

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub document_id: String,
    /// Editor location, e.g. `/editor?document_id=...`.
    pub location: String,
}

impl HistoryEntry {
    fn new(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            location: editor_location(document_id),
        }
    }
}

/// Build the editor location for a document.
pub fn editor_location(document_id: &str) -> String {
    format!(
        "{}?document_id={}",
        EDITOR_PATH,
        urlencoding::encode(document_id)
    )
}

/// Resolve a document reference given as a bare id or as an editor URL.
///
/// Accepts absolute URLs (`http://host/editor?document_id=x`) and relative
/// locations (`/editor?document_id=x`).
pub fn parse_document_ref(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.contains("document_id=") {
        return Some(trimmed.to_string());
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => Url::parse("http://localhost").ok()?.join(trimmed).ok()?,
    };

    url.query_pairs()
        .find(|(key, _)| key == "document_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Session history of visited documents.
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    events: EventSender,
}

impl History {
    /// Start a history whose initial entry is `document_id`.
    pub fn new(document_id: &str, events: EventSender) -> Self {
        Self {
            entries: vec![HistoryEntry::new(document_id)],
            index: 0,
            events,
        }
    }

    /// Add an entry after the current one, discarding forward entries.
    pub fn push(&mut self, document_id: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry::new(document_id));
        self.index = self.entries.len() - 1;
        debug!("History push: {}", self.current().location);
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.announce();
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        self.announce();
        true
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn announce(&self) {
        let document_id = self.current().document_id.clone();
        debug!("History pop: {}", self.current().location);
        let _ = self.events.send(EditorEvent::HistoryPopped { document_id });
    }
}
