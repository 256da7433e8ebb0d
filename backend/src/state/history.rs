//! Conversation history store
//!
//! Keeps the list of past conversations (newest first) and mirrors every
//! change to local storage. Storage failures are logged and otherwise
//! ignored: a failed load yields an empty list, a failed save is not retried.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::persistence::{load_json, save_json, Storage};
use crate::chat::models::{Conversation, Message, SessionId};

/// Storage key of the history document
pub const HISTORY_KEY: &str = "chatHistory";

/// History entry as listed in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    /// Session identifier
    pub id: SessionId,
    /// Conversation title
    pub title: String,
}

/// History entries partitioned by age
///
/// Entries older than 30 days are not part of any group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryGroups {
    /// Updated within the last 24 hours
    pub today: Vec<HistoryItem>,
    /// Updated within the last 7 days
    pub this_week: Vec<HistoryItem>,
    /// Updated within the last 30 days
    pub this_month: Vec<HistoryItem>,
}

impl HistoryGroups {
    /// Whether no entry is visible
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.this_week.is_empty() && self.this_month.is_empty()
    }
}

/// Partition entries by how long ago they were updated
///
/// Boundaries are strict: an entry exactly 24 hours old is no longer
/// "today".
pub fn group_by_age(entries: &[Conversation], now: DateTime<Utc>) -> HistoryGroups {
    let one_day_ago = now - Duration::hours(24);
    let one_week_ago = now - Duration::days(7);
    let one_month_ago = now - Duration::days(30);

    let mut groups = HistoryGroups::default();
    for entry in entries {
        let item = HistoryItem {
            id: entry.id.clone(),
            title: entry.title.clone(),
        };
        if entry.timestamp > one_day_ago {
            groups.today.push(item);
        } else if entry.timestamp > one_week_ago {
            groups.this_week.push(item);
        } else if entry.timestamp > one_month_ago {
            groups.this_month.push(item);
        }
    }
    groups
}

/// Persisted list of conversations
pub struct HistoryStore {
    storage: Arc<dyn Storage>,
    entries: Vec<Conversation>,
}

impl HistoryStore {
    /// Create a store and load whatever is persisted
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let mut store = Self {
            storage,
            entries: Vec::new(),
        };
        store.load();
        store
    }

    /// Reload entries from storage
    ///
    /// Missing or unreadable data yields an empty list.
    pub fn load(&mut self) -> &[Conversation] {
        self.entries = match load_json::<Vec<Conversation>>(self.storage.as_ref(), HISTORY_KEY) {
            Ok(Some(entries)) => {
                info!(count = entries.len(), "Loaded chat history");
                entries
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = %e, "Error loading chat history");
                Vec::new()
            }
        };
        &self.entries
    }

    /// Persist the current entries; failures are logged only
    pub fn save(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), HISTORY_KEY, &self.entries) {
            error!(error = %e, "Error saving chat history");
        }
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Conversation] {
        &self.entries
    }

    /// Look up an entry by session id
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Replace the entry with the same id, or prepend a new one
    pub fn upsert(&mut self, entry: Conversation) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.insert(0, entry),
        }
        self.save();
    }

    /// Append a message to an existing entry
    ///
    /// Returns false when no entry has that id.
    pub fn append_message(&mut self, id: &str, message: Message) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.timestamp = message.timestamp;
        entry.messages.push(message);
        self.save();
        true
    }

    /// Delete an entry; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        self.save();
        removed
    }

    /// Delete every entry
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.save();
    }

    /// Entries grouped for display at `now`
    pub fn grouped(&self, now: DateTime<Utc>) -> HistoryGroups {
        group_by_age(&self.entries, now)
    }
}
