// Conversation state
// The active conversation, its pending exchange, and the input buffers the
// UI edits. All transitions are plain methods; the controller performs the
// side effects they call for.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::chat::bridge::SendMessageResult;
use crate::chat::fallback::fallback_response;
use crate::chat::models::{generate_session_id, Conversation, Message, Sender, SessionId};
use crate::chat::quick_actions::IdPrompt;
use crate::chat::MAX_MESSAGE_CHARS;
use crate::error::{validate_message, ChatError};

/// First message of every fresh conversation
pub const WELCOME_MESSAGE: &str = "Hello! How can I help you today? You can ask me about projects, contracts, or use the quick actions below.";

/// Exchange lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to send
    Idle,
    /// A message was sent and its reply has not arrived yet
    AwaitingResponse,
}

/// A message that was sent and is waiting for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    /// Session the message belongs to
    pub session_id: SessionId,
    /// Trimmed message text
    pub text: String,
}

/// Why a send did not start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendRejected {
    /// The text failed validation
    #[error(transparent)]
    Invalid(#[from] ChatError),

    /// Another exchange is still pending
    #[error("A response is still pending")]
    Busy,
}

/// Where a reply ended up
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyDelivery {
    /// Appended to the visible conversation
    Current(Message),
    /// Belongs to a conversation that is no longer active
    Background {
        /// Session the reply belongs to
        session_id: SessionId,
        /// The reply
        message: Message,
    },
}

/// Panel visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// History sidebar shown
    pub sidebar_visible: bool,
    /// Welcome screen shown instead of the message list
    pub welcome_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            welcome_visible: true,
        }
    }
}

/// Text the user is editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffers {
    /// Message input
    pub draft: String,
    /// Open identifier prompt, if any
    pub quick_prompt: Option<IdPrompt>,
    /// Identifier prompt input
    pub prompt_input: String,
}

impl InputBuffers {
    /// Length of the draft in characters
    pub fn draft_chars(&self) -> usize {
        self.draft.chars().count()
    }
}

/// The active conversation
#[derive(Debug, Clone)]
pub struct ChatState {
    session_id: SessionId,
    messages: Vec<Message>,
    pending: Option<PendingExchange>,
    /// Panel visibility
    pub ui: UiState,
    /// Input buffers
    pub inputs: InputBuffers,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// A fresh conversation holding only the welcome message
    pub fn new() -> Self {
        Self {
            session_id: generate_session_id(),
            messages: vec![welcome_message()],
            pending: None,
            ui: UiState::default(),
            inputs: InputBuffers::default(),
        }
    }

    /// Active session id
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Messages of the active conversation, welcome message included
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Outstanding exchange, possibly for another session
    pub fn pending(&self) -> Option<&PendingExchange> {
        self.pending.as_ref()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::AwaitingResponse
        } else {
            Phase::Idle
        }
    }

    /// Whether a reply is outstanding
    pub fn is_awaiting(&self) -> bool {
        self.phase() == Phase::AwaitingResponse
    }

    /// Whether the typing indicator belongs in the visible conversation
    pub fn is_typing(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.session_id == self.session_id)
    }

    /// Whether the conversation holds more than the welcome message
    pub fn has_conversation(&self) -> bool {
        self.messages.len() > 1
    }

    /// Send-button gating for the current draft
    pub fn can_send_draft(&self) -> bool {
        !self.is_awaiting()
            && !self.inputs.draft.trim().is_empty()
            && self.inputs.draft_chars() <= MAX_MESSAGE_CHARS
    }

    /// Start an exchange for `text`
    ///
    /// On success the user message is appended, the draft is cleared and the
    /// state awaits a reply. On rejection nothing changes.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingExchange, SendRejected> {
        if self.is_awaiting() {
            return Err(SendRejected::Busy);
        }
        let text = validate_message(text)?.to_string();

        self.messages.push(Message::user(text.clone()));
        self.inputs.draft.clear();
        self.ui.welcome_visible = false;

        let pending = PendingExchange {
            session_id: self.session_id.clone(),
            text,
        };
        self.pending = Some(pending.clone());
        debug!(session_id = %pending.session_id, "Awaiting response");
        Ok(pending)
    }

    /// Finish the pending exchange with the bridge's result
    ///
    /// A failed result is replaced by a fallback reply. Results that do not
    /// match the pending exchange are dropped.
    pub fn complete_send(&mut self, result: SendMessageResult) -> Option<ReplyDelivery> {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.session_id == result.session_id);
        if !matches {
            warn!(session_id = %result.session_id, "Dropping unexpected chat result");
            return None;
        }
        let pending = self.pending.take()?;

        let text = match result.response {
            Some(reply) if result.success => reply.display_text(),
            _ => fallback_response(&pending.text),
        };
        let message = Message::bot(text);

        if pending.session_id == self.session_id {
            self.messages.push(message.clone());
            Some(ReplyDelivery::Current(message))
        } else {
            Some(ReplyDelivery::Background {
                session_id: pending.session_id,
                message,
            })
        }
    }

    /// Replace the conversation with a fresh one
    pub fn reset_conversation(&mut self) {
        self.session_id = generate_session_id();
        self.messages = vec![welcome_message()];
        self.ui.welcome_visible = true;
    }

    /// New-chat action; returns whether a fresh conversation was started
    pub fn start_new_chat(&mut self) -> bool {
        if self.has_conversation() {
            self.reset_conversation();
            true
        } else {
            self.ui.welcome_visible = true;
            false
        }
    }

    /// Make a stored conversation the active one
    pub fn load_conversation(&mut self, entry: &Conversation) {
        self.session_id = entry.id.clone();
        self.messages = entry.messages.clone();
        self.ui.welcome_visible = !self.has_conversation();
    }

    /// History entry for the active conversation, stamped `now`
    pub fn snapshot(&self, now: DateTime<Utc>) -> Conversation {
        Conversation::from_messages(self.session_id.clone(), self.messages.clone(), now)
    }

    /// Open the identifier prompt
    pub fn open_prompt(&mut self, prompt: IdPrompt) {
        self.inputs.quick_prompt = Some(prompt);
        self.inputs.prompt_input.clear();
    }

    /// Close the identifier prompt
    pub fn close_prompt(&mut self) {
        self.inputs.quick_prompt = None;
        self.inputs.prompt_input.clear();
    }

    /// Show or hide the history sidebar
    pub fn toggle_sidebar(&mut self) {
        self.ui.sidebar_visible = !self.ui.sidebar_visible;
    }
}

/// Whether `message` is the greeting every conversation opens with
pub fn is_welcome(message: &Message) -> bool {
    message.sender == Sender::Bot && message.text == WELCOME_MESSAGE
}

fn welcome_message() -> Message {
    Message::bot(WELCOME_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::transport::BotReply;
    use serde_json::json;

    fn ok(session_id: &str, reply: BotReply) -> SendMessageResult {
        SendMessageResult {
            success: true,
            response: Some(reply),
            error: None,
            session_id: session_id.to_string(),
        }
    }

    fn failed(session_id: &str) -> SendMessageResult {
        SendMessageResult {
            success: false,
            response: None,
            error: Some("Network Error: Unable to reach the server".to_string()),
            session_id: session_id.to_string(),
        }
    }

    #[test]
    fn test_new_state_has_welcome_only() {
        let state = ChatState::new();
        assert_eq!(state.messages().len(), 1);
        assert!(is_welcome(&state.messages()[0]));
        assert!(!state.has_conversation());
        assert!(state.ui.welcome_visible);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_begin_send_appends_user_message() {
        let mut state = ChatState::new();
        state.inputs.draft = "  hello there  ".to_string();

        let draft = state.inputs.draft.clone();
        let pending = state.begin_send(&draft).unwrap();

        assert_eq!(pending.text, "hello there");
        assert_eq!(pending.session_id, state.session_id());
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].sender, Sender::User);
        assert!(state.inputs.draft.is_empty());
        assert!(!state.ui.welcome_visible);
        assert!(state.is_typing());
        assert!(!state.can_send_draft());
    }

    #[test]
    fn test_begin_send_rejections_leave_state_untouched() {
        let mut state = ChatState::new();
        state.inputs.draft = "   ".to_string();

        assert_eq!(
            state.begin_send("   ").unwrap_err(),
            SendRejected::Invalid(ChatError::EmptyMessage)
        );
        assert!(matches!(
            state.begin_send(&"x".repeat(MAX_MESSAGE_CHARS + 1)),
            Err(SendRejected::Invalid(ChatError::MessageTooLong { .. }))
        ));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.inputs.draft, "   ");
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_second_send_while_pending_is_refused() {
        let mut state = ChatState::new();
        state.begin_send("first").unwrap();
        assert_eq!(state.begin_send("second").unwrap_err(), SendRejected::Busy);
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_can_send_draft_limits() {
        let mut state = ChatState::new();
        assert!(!state.can_send_draft());

        state.inputs.draft = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(state.can_send_draft());

        state.inputs.draft.push('x');
        assert!(!state.can_send_draft());
    }

    #[test]
    fn test_complete_send_success() {
        let mut state = ChatState::new();
        let pending = state.begin_send("hi").unwrap();

        let delivery = state
            .complete_send(ok(&pending.session_id, BotReply::Text("hey".to_string())))
            .unwrap();

        assert!(matches!(delivery, ReplyDelivery::Current(ref m) if m.text == "hey"));
        assert_eq!(state.messages().len(), 3);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_complete_send_pretty_prints_structured_reply() {
        let mut state = ChatState::new();
        let pending = state.begin_send("data please").unwrap();

        state.complete_send(ok(
            &pending.session_id,
            BotReply::Structured(json!({"count": 2})),
        ));

        let last = state.messages().last().unwrap();
        assert_eq!(last.text, "{\n  \"count\": 2\n}");
    }

    #[test]
    fn test_failure_adds_exactly_one_fallback_message() {
        let mut state = ChatState::new();
        let pending = state.begin_send("help").unwrap();

        state.complete_send(failed(&pending.session_id));

        assert_eq!(state.messages().len(), 3);
        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, fallback_response("help"));
        assert!(!last.text.contains("Network Error"));
    }

    #[test]
    fn test_unexpected_result_is_dropped() {
        let mut state = ChatState::new();
        assert!(state.complete_send(failed("chat_0_unknown")).is_none());

        state.begin_send("hello").unwrap();
        assert!(state.complete_send(failed("chat_0_unknown")).is_none());
        assert!(state.is_awaiting());
    }

    #[test]
    fn test_late_reply_goes_to_background() {
        let mut state = ChatState::new();
        let pending = state.begin_send("hello").unwrap();
        state.reset_conversation();

        assert!(!state.is_typing());
        assert!(state.is_awaiting());

        match state.complete_send(ok(&pending.session_id, BotReply::Text("late".to_string()))) {
            Some(ReplyDelivery::Background { session_id, message }) => {
                assert_eq!(session_id, pending.session_id);
                assert_eq!(message.text, "late");
            }
            other => panic!("unexpected delivery: {:?}", other),
        }
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_start_new_chat() {
        let mut state = ChatState::new();
        let first = state.session_id().to_string();

        state.ui.welcome_visible = false;
        assert!(!state.start_new_chat());
        assert_eq!(state.session_id(), first);
        assert!(state.ui.welcome_visible);

        state.begin_send("hello").unwrap();
        assert!(state.start_new_chat());
        assert_ne!(state.session_id(), first);
        assert_eq!(state.messages().len(), 1);
        assert!(is_welcome(&state.messages()[0]));
    }

    #[test]
    fn test_load_conversation_and_snapshot() {
        let mut state = ChatState::new();
        state.begin_send("What is up?").unwrap();
        let entry = state.snapshot(Utc::now());
        assert_eq!(entry.title, "What is up?");

        state.reset_conversation();
        state.load_conversation(&entry);
        assert_eq!(state.session_id(), entry.id);
        assert_eq!(state.messages(), entry.messages.as_slice());
        assert!(!state.ui.welcome_visible);
    }

    #[test]
    fn test_prompt_and_sidebar_toggles() {
        let mut state = ChatState::new();
        state.inputs.prompt_input = "stale".to_string();
        state.open_prompt(IdPrompt::Contract);
        assert_eq!(state.inputs.quick_prompt, Some(IdPrompt::Contract));
        assert!(state.inputs.prompt_input.is_empty());

        state.close_prompt();
        assert_eq!(state.inputs.quick_prompt, None);

        state.toggle_sidebar();
        assert!(!state.ui.sidebar_visible);
    }
}
