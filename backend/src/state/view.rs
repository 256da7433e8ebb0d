//! View model
//!
//! A serializable snapshot of everything the window draws. The GUI renders
//! from a [`ChatView`] and never reads the stores directly.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::app_state::{is_welcome, ChatState};
use super::history::{HistoryGroups, HistoryItem, HistoryStore};
use super::servers::ServerRegistry;
use crate::chat::models::{Message, RecordId, Sender, ServerEndpoint, SessionId};
use crate::chat::MAX_MESSAGE_CHARS;
use crate::services::export::format_clock;

/// A rendered message bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    /// Message id
    pub id: RecordId,
    /// Message text
    pub text: String,
    /// Author
    pub sender: Sender,
    /// Local time as `HH:MM`
    pub time: String,
}

/// A sidebar history row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRowView {
    /// Session id
    pub id: SessionId,
    /// Conversation title
    pub title: String,
    /// Whether this is the active conversation
    pub active: bool,
}

/// Sidebar sections, newest first within each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    /// Last 24 hours
    pub today: Vec<HistoryRowView>,
    /// Last 7 days
    pub this_week: Vec<HistoryRowView>,
    /// Last 30 days
    pub this_month: Vec<HistoryRowView>,
}

/// Open identifier prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    /// Window title
    pub title: String,
    /// Input placeholder
    pub placeholder: String,
}

/// Everything the window needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatView {
    /// Active session
    pub session_id: SessionId,
    /// Visible messages, without the welcome greeting
    pub messages: Vec<MessageView>,
    /// Typing indicator shown
    pub typing: bool,
    /// Welcome screen shown
    pub welcome_visible: bool,
    /// Sidebar shown
    pub sidebar_visible: bool,
    /// Characters in the draft
    pub draft_chars: usize,
    /// Character limit
    pub max_chars: usize,
    /// Draft exceeds the limit
    pub over_limit: bool,
    /// Send button enabled
    pub send_enabled: bool,
    /// Whether there is anything to export or clear
    pub has_conversation: bool,
    /// Sidebar history
    pub history: HistoryView,
    /// Open identifier prompt
    pub prompt: Option<PromptView>,
    /// Registered servers
    pub servers: Vec<ServerEndpoint>,
}

impl ChatView {
    /// Character counter label
    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.draft_chars, self.max_chars)
    }
}

/// Build the view for `now`
pub fn build_view(
    state: &ChatState,
    history: &HistoryStore,
    servers: &ServerRegistry,
    now: DateTime<Utc>,
) -> ChatView {
    let draft_chars = state.inputs.draft_chars();

    ChatView {
        session_id: state.session_id().to_string(),
        messages: visible_messages(state.messages()),
        typing: state.is_typing(),
        welcome_visible: state.ui.welcome_visible,
        sidebar_visible: state.ui.sidebar_visible,
        draft_chars,
        max_chars: MAX_MESSAGE_CHARS,
        over_limit: draft_chars > MAX_MESSAGE_CHARS,
        send_enabled: state.can_send_draft(),
        has_conversation: state.has_conversation(),
        history: history_view(history.grouped(now), state.session_id()),
        prompt: state.inputs.quick_prompt.map(|prompt| PromptView {
            title: prompt.title().to_string(),
            placeholder: prompt.placeholder().to_string(),
        }),
        servers: servers.servers().to_vec(),
    }
}

fn visible_messages(messages: &[Message]) -> Vec<MessageView> {
    let skip = usize::from(messages.first().is_some_and(is_welcome));
    messages
        .iter()
        .skip(skip)
        .map(|message| MessageView {
            id: message.id.clone(),
            text: message.text.clone(),
            sender: message.sender,
            time: format_clock(message.timestamp, &Local),
        })
        .collect()
}

fn history_view(groups: HistoryGroups, active: &str) -> HistoryView {
    let rows = |items: Vec<HistoryItem>| -> Vec<HistoryRowView> {
        items
            .into_iter()
            .map(|item| HistoryRowView {
                active: item.id == active,
                id: item.id,
                title: item.title,
            })
            .collect()
    };
    HistoryView {
        today: rows(groups.today),
        this_week: rows(groups.this_week),
        this_month: rows(groups.this_month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Conversation;
    use crate::chat::quick_actions::IdPrompt;
    use crate::state::persistence::MemoryStorage;
    use chrono::Duration;
    use std::sync::Arc;

    fn stores() -> (HistoryStore, ServerRegistry) {
        let storage = Arc::new(MemoryStorage::new());
        (
            HistoryStore::open(storage.clone()),
            ServerRegistry::open(storage),
        )
    }

    #[test]
    fn test_welcome_is_not_rendered() {
        let (history, servers) = stores();
        let mut state = ChatState::new();

        let view = build_view(&state, &history, &servers, Utc::now());
        assert!(view.messages.is_empty());
        assert!(view.welcome_visible);
        assert!(!view.send_enabled);

        state.begin_send("hello").unwrap();
        let view = build_view(&state, &history, &servers, Utc::now());
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].text, "hello");
        assert_eq!(view.messages[0].time.len(), 5);
        assert!(view.typing);
    }

    #[test]
    fn test_counter_and_limits() {
        let (history, servers) = stores();
        let mut state = ChatState::new();
        state.inputs.draft = "x".repeat(MAX_MESSAGE_CHARS + 5);

        let view = build_view(&state, &history, &servers, Utc::now());
        assert_eq!(view.counter_label(), "2005 / 2000");
        assert!(view.over_limit);
        assert!(!view.send_enabled);
    }

    #[test]
    fn test_history_rows_mark_active() {
        let (mut history, servers) = stores();
        let state = ChatState::new();
        let now = Utc::now();

        history.upsert(Conversation::from_messages(
            state.session_id().to_string(),
            state.messages().to_vec(),
            now,
        ));
        history.upsert(Conversation::from_messages(
            "chat_1_other".to_string(),
            vec![Message::user("older")],
            now - Duration::days(3),
        ));

        let view = build_view(&state, &history, &servers, now);
        assert_eq!(view.history.today.len(), 1);
        assert!(view.history.today[0].active);
        assert_eq!(view.history.this_week[0].title, "older");
        assert!(!view.history.this_week[0].active);
    }

    #[test]
    fn test_prompt_view() {
        let (history, servers) = stores();
        let mut state = ChatState::new();
        state.open_prompt(IdPrompt::Project);

        let view = build_view(&state, &history, &servers, Utc::now());
        let prompt = view.prompt.unwrap();
        assert_eq!(prompt.title, IdPrompt::Project.title());
    }
}
