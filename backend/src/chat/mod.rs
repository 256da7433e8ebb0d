//! Chat module
//!
//! Message models, the HTTP transport to the chat backend, the bridge that
//! runs it off the UI thread, and the local fallback replies.

pub mod bridge;
pub mod fallback;
pub mod models;
pub mod quick_actions;
pub mod transport;

pub use bridge::{Bridge, BridgeEvent, Notification, SendMessageResult};
pub use fallback::fallback_response;
pub use models::{Conversation, Message, Sender, ServerEndpoint, SessionId};
pub use quick_actions::{IdPrompt, QuickAction, QuickActionOutcome};
pub use transport::{BotReply, HttpTransport, TransportClient};

/// Maximum length of an outgoing message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;
