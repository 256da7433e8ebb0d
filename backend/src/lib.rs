//! Chat Desk Backend Library
//!
//! Everything behind the chat window: the HTTP transport and the bridge that
//! runs it, local persistence, the conversation controller and its view
//! model. The desktop binary lives in the root package.

pub mod chat;
pub mod config;
pub mod error;
pub mod services;
/// Conversation state and persistence
///
/// Handles the active conversation, chat history, the server registry and
/// the controller that ties them to the bridge.
pub mod state;
