//! Conversation controller
//!
//! Wires the conversation state to its ports: the bridge for network work,
//! the history store and the server registry for persistence, and a
//! [`Confirm`] prompt for destructive actions. The GUI calls one method per
//! user action and [`ChatController::pump`] once per frame.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::app_state::{ChatState, InputBuffers, ReplyDelivery, SendRejected};
use super::history::HistoryStore;
use super::persistence::Storage;
use super::servers::{RegistryError, ServerDraft, ServerRegistry};
use super::view::{build_view, ChatView};
use crate::chat::bridge::{Bridge, BridgeEvent, ConfigSyncResult, Notification, Waker};
use crate::chat::models::ServerEndpoint;
use crate::chat::quick_actions::{QuickAction, QuickActionOutcome};
use crate::services::export::{ExportError, Transcript};

/// Prompt shown before deleting one conversation
pub const DELETE_CHAT_PROMPT: &str = "Delete this chat?";

/// Prompt shown before deleting every conversation
pub const DELETE_ALL_PROMPT: &str = "Delete all chat history? This cannot be undone.";

/// Synchronous yes/no question asked before destructive actions
pub trait Confirm {
    /// Ask `prompt`; true means go ahead
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Drives the active conversation
pub struct ChatController {
    state: ChatState,
    history: HistoryStore,
    servers: ServerRegistry,
    bridge: Bridge,
    last_sync: Option<ConfigSyncResult>,
}

impl ChatController {
    /// Create a controller over `bridge`, loading history and servers from `storage`
    pub fn new(bridge: Bridge, storage: Arc<dyn Storage>) -> Self {
        let history = HistoryStore::open(Arc::clone(&storage));
        let servers = ServerRegistry::open(storage);
        let state = ChatState::new();
        info!(session_id = %state.session_id(), "Chat controller ready");

        Self {
            state,
            history,
            servers,
            bridge,
            last_sync: None,
        }
    }

    /// Conversation state
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Input buffers edited by the UI
    pub fn inputs_mut(&mut self) -> &mut InputBuffers {
        &mut self.state.inputs
    }

    /// History store
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Server registry
    pub fn servers(&self) -> &ServerRegistry {
        &self.servers
    }

    /// Outcome of the latest configuration push
    pub fn last_sync(&self) -> Option<&ConfigSyncResult> {
        self.last_sync.as_ref()
    }

    /// Send whatever is in the message input
    pub fn send_draft(&mut self) -> Result<(), SendRejected> {
        let draft = self.state.inputs.draft.clone();
        self.send_text(&draft)
    }

    /// Send `text` as a user message
    ///
    /// Rejected sends change nothing and make no network call.
    pub fn send_text(&mut self, text: &str) -> Result<(), SendRejected> {
        let pending = match self.state.begin_send(text) {
            Ok(pending) => pending,
            Err(e) => {
                debug!(reason = %e, "Send rejected");
                return Err(e);
            }
        };
        self.history.upsert(self.state.snapshot(Utc::now()));
        self.bridge.send_message(pending.text, pending.session_id);
        Ok(())
    }

    /// Run a quick action card
    pub fn quick_action(&mut self, action: QuickAction) {
        match action.outcome() {
            QuickActionOutcome::Send(message) => {
                // Refused only while a reply is pending
                let _ = self.send_text(&message);
            }
            QuickActionOutcome::Prompt(prompt) => self.state.open_prompt(prompt),
        }
    }

    /// Submit the identifier prompt; blank input keeps it open
    pub fn submit_prompt(&mut self) -> Result<(), SendRejected> {
        let Some(prompt) = self.state.inputs.quick_prompt else {
            return Ok(());
        };
        let Some(message) = prompt.message_for(&self.state.inputs.prompt_input) else {
            return Ok(());
        };
        self.state.close_prompt();
        self.send_text(&message)
    }

    /// Dismiss the identifier prompt
    pub fn cancel_prompt(&mut self) {
        self.state.close_prompt();
    }

    /// Show or hide the history sidebar
    pub fn toggle_sidebar(&mut self) {
        self.state.toggle_sidebar();
    }

    /// New-chat action
    pub fn start_new_chat(&mut self) {
        if self.state.start_new_chat() {
            info!(session_id = %self.state.session_id(), "Started new chat");
        }
    }

    /// Clear the active conversation after confirmation
    ///
    /// Returns whether anything was cleared.
    pub fn clear_chat(&mut self, confirm: &dyn Confirm) -> bool {
        if !self.state.has_conversation() || !confirm.confirm(DELETE_CHAT_PROMPT) {
            return false;
        }
        let session_id = self.state.session_id().to_string();
        self.bridge.clear_session(session_id.clone());
        self.history.remove(&session_id);
        self.state.reset_conversation();
        info!(session_id = %session_id, "Chat cleared");
        true
    }

    /// Delete one history entry after confirmation
    ///
    /// Deleting the active conversation starts a fresh one.
    pub fn delete_chat(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_CHAT_PROMPT) {
            return false;
        }
        self.history.remove(id);
        if id == self.state.session_id() {
            self.state.reset_conversation();
        }
        info!(session_id = %id, "Chat deleted");
        true
    }

    /// Delete every history entry after confirmation
    pub fn delete_all_chats(&mut self, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_ALL_PROMPT) {
            return false;
        }
        self.history.remove_all();
        if self.state.has_conversation() {
            self.state.reset_conversation();
        }
        info!("All chats deleted");
        true
    }

    /// Make a history entry the active conversation
    ///
    /// Also asks the backend for its copy of the session.
    pub fn load_chat(&mut self, id: &str) -> bool {
        let Some(entry) = self.history.get(id).cloned() else {
            warn!(session_id = %id, "Cannot load unknown chat");
            return false;
        };
        self.state.load_conversation(&entry);
        self.bridge.get_history(entry.id);
        true
    }

    /// Render the active conversation for export
    pub fn export_transcript(&self, now: DateTime<Utc>) -> Result<Transcript, ExportError> {
        Transcript::from_messages(self.state.messages(), now)
    }

    /// Register a server and sync the registry
    pub fn add_server(&mut self, draft: &ServerDraft) -> Result<ServerEndpoint, RegistryError> {
        let server = self.servers.add(draft)?;
        self.sync_servers();
        Ok(server)
    }

    /// Edit a server and sync the registry
    pub fn update_server(&mut self, id: &str, draft: &ServerDraft) -> Result<(), RegistryError> {
        self.servers.update(id, draft)?;
        self.sync_servers();
        Ok(())
    }

    /// Remove a server and sync the registry
    pub fn remove_server(&mut self, id: &str) -> bool {
        let removed = self.servers.remove(id);
        if removed {
            self.sync_servers();
        }
        removed
    }

    /// Push the registry to the backend's configuration API
    pub fn sync_servers(&mut self) {
        debug!(count = self.servers.servers().len(), "Syncing servers");
        self.bridge.push_config(self.servers.sync_document());
    }

    /// Point the transport at a different chat endpoint
    pub fn set_api_endpoint(&self, endpoint: &str) {
        self.bridge.set_api_endpoint(endpoint);
    }

    /// Publish a menu notification
    pub fn notify(&self, notification: Notification) {
        self.bridge.notify(notification);
    }

    /// Install the callback that wakes the UI
    pub fn set_waker(&self, waker: Waker) {
        self.bridge.set_waker(waker);
    }

    /// Apply every queued bridge event
    ///
    /// Returns the notifications the window has to act on; new-chat is
    /// handled here.
    pub fn pump(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        while let Some(event) = self.bridge.try_next() {
            self.apply(event, &mut notifications);
        }
        notifications
    }

    /// Wait up to `timeout` for an event, then apply everything queued
    pub fn pump_timeout(&mut self, timeout: Duration) -> Vec<Notification> {
        let mut notifications = Vec::new();
        if let Some(event) = self.bridge.next_timeout(timeout) {
            self.apply(event, &mut notifications);
        }
        notifications.extend(self.pump());
        notifications
    }

    /// View model for `now`
    pub fn view(&self, now: DateTime<Utc>) -> ChatView {
        build_view(&self.state, &self.history, &self.servers, now)
    }

    fn apply(&mut self, event: BridgeEvent, notifications: &mut Vec<Notification>) {
        match event {
            BridgeEvent::MessageResult(result) => match self.state.complete_send(result) {
                Some(ReplyDelivery::Current(_)) => {
                    self.history.upsert(self.state.snapshot(Utc::now()));
                }
                Some(ReplyDelivery::Background {
                    session_id,
                    message,
                }) => {
                    if !self.history.append_message(&session_id, message) {
                        warn!(session_id = %session_id, "Reply for a deleted chat dropped");
                    }
                }
                None => {}
            },
            BridgeEvent::SessionCleared(_) => debug!("Session cleared"),
            BridgeEvent::History(result) => {
                if result.history.is_empty() {
                    debug!(session_id = %result.session_id, "No remote history");
                } else {
                    info!(
                        session_id = %result.session_id,
                        count = result.history.len(),
                        "Remote history received"
                    );
                }
            }
            BridgeEvent::ConfigSynced(result) => {
                if result.success {
                    info!("Server configuration synced");
                }
                self.last_sync = Some(result);
            }
            BridgeEvent::Notification(Notification::NewChat) => self.start_new_chat(),
            BridgeEvent::Notification(other) => notifications.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Sender;
    use crate::chat::transport::{BotReply, TransportClient};
    use crate::error::ChatError;
    use crate::state::persistence::MemoryStorage;
    use async_trait::async_trait;
    use serde_json::Value;

    struct DownTransport;

    #[async_trait]
    impl TransportClient for DownTransport {
        async fn send_message(
            &self,
            _message: &str,
            _session_id: &str,
        ) -> Result<BotReply, ChatError> {
            Err(ChatError::Timeout)
        }
        async fn clear_session(&self, _session_id: &str) {}
        async fn get_chat_history(&self, _session_id: &str) -> Vec<Value> {
            Vec::new()
        }
        async fn push_config(&self, _document: &Value) -> Result<(), ChatError> {
            Ok(())
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    fn controller() -> ChatController {
        let bridge = Bridge::new(Arc::new(DownTransport)).unwrap();
        ChatController::new(bridge, Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_send_failure_falls_back() {
        let mut controller = controller();
        controller.inputs_mut().draft = "hello".to_string();
        controller.send_draft().unwrap();
        controller.pump_timeout(WAIT);

        let messages = controller.state().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].text, "Hello! How can I assist you today?");
        assert_eq!(controller.history().entries().len(), 1);
        assert_eq!(controller.history().entries()[0].messages.len(), 3);
    }

    #[test]
    fn test_quick_action_prompt_flow() {
        let mut controller = controller();
        controller.quick_action(QuickAction::ProjectById);
        assert!(controller.state().inputs.quick_prompt.is_some());

        controller.inputs_mut().prompt_input = "   ".to_string();
        controller.submit_prompt().unwrap();
        assert!(controller.state().inputs.quick_prompt.is_some());
        assert_eq!(controller.state().messages().len(), 1);

        controller.inputs_mut().prompt_input = "42".to_string();
        controller.submit_prompt().unwrap();
        assert!(controller.state().inputs.quick_prompt.is_none());
        assert_eq!(
            controller.state().messages()[1].text,
            "Show me project with ID 42"
        );
    }

    #[test]
    fn test_menu_notifications_are_routed() {
        let mut controller = controller();
        controller.send_text("hello").unwrap();
        controller.pump_timeout(WAIT);
        let before = controller.state().session_id().to_string();

        controller.notify(Notification::NewChat);
        controller.notify(Notification::ShowAbout);
        let notifications = controller.pump();

        assert_eq!(notifications, vec![Notification::ShowAbout]);
        assert_ne!(controller.state().session_id(), before);
    }

    #[test]
    fn test_export_needs_messages() {
        let mut controller = controller();
        assert!(controller.export_transcript(Utc::now()).is_err());

        controller.send_text("hello").unwrap();
        controller.pump_timeout(WAIT);
        let transcript = controller.export_transcript(Utc::now()).unwrap();
        assert!(transcript.contents.contains("You: hello"));
    }
}
