//! Chat data models
//!
//! Defines structures for messages, conversations and server endpoints.
//! All of them serialize to the JSON documents kept in local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a conversation
pub type SessionId = String;

/// Opaque identifier of a message or server endpoint
pub type RecordId = String;

/// Maximum title length (in characters) derived from the first user message
pub const TITLE_MAX_CHARS: usize = 50;

/// Title of a conversation without any user message
pub const UNTITLED_CONVERSATION: &str = "New Chat";

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user
    User,
    /// Message from the chat backend or the local fallback
    Bot,
}

impl Sender {
    /// Convert the sender to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Label used in exported transcripts
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Assistant",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message
    pub id: RecordId,
    /// Content of the message
    pub text: String,
    /// Who wrote the message
    pub sender: Sender,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self::at(text, sender, Utc::now())
    }

    /// Create a new message with an explicit timestamp
    pub fn at(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Create a bot message
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }
}

/// A conversation as kept in the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Session identifier of the conversation
    pub id: SessionId,
    /// Title derived from the first user message
    pub title: String,
    /// When the conversation was last updated
    pub timestamp: DateTime<Utc>,
    /// Full message list
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Build a history entry from a session's messages
    pub fn from_messages(id: SessionId, messages: Vec<Message>, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: conversation_title(&messages),
            id,
            timestamp,
            messages,
        }
    }
}

/// Derive a conversation title from its first user message
///
/// Titles longer than [`TITLE_MAX_CHARS`] characters are cut and suffixed
/// with `...`.
pub fn conversation_title(messages: &[Message]) -> String {
    let Some(first) = messages.iter().find(|m| m.sender == Sender::User) else {
        return UNTITLED_CONVERSATION.to_string();
    };

    let mut title: String = first.text.chars().take(TITLE_MAX_CHARS).collect();
    if first.text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// A user-defined remote service endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    /// Identifier, unique within the registry
    pub id: RecordId,
    /// Display name (never empty)
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Endpoint URL (never empty)
    pub url: String,
    /// Optional icon, stored as a data URL or path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Generate a new session identifier
///
/// Combines the current time with a short random suffix; uniqueness is
/// probabilistic.
pub fn generate_session_id() -> SessionId {
    format!("chat_{}_{}", Utc::now().timestamp_millis(), short_random())
}

/// Generate a new message or record identifier
pub fn generate_id() -> RecordId {
    short_random()
}

fn short_random() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(9);
    id
}
