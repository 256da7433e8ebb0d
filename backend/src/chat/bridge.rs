//! Bridge between the UI thread and the transport
//!
//! The UI never touches the network directly. It asks the bridge for one of
//! a few request/response operations; the bridge runs them on its own tokio
//! runtime and posts the result back as a [`BridgeEvent`], which the UI drains
//! once per frame. Menu actions travel the same channel as one-way
//! [`Notification`]s.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use super::models::SessionId;
use super::transport::{BotReply, TransportClient};

/// Callback used to wake the UI when an event is queued
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// One-way menu notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// File > New Chat
    NewChat,
    /// File > Export Chat
    ExportChat,
    /// File > Settings
    OpenSettings,
    /// Help > About
    ShowAbout,
}

/// Result of a send-message request
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageResult {
    /// Whether the backend produced a reply
    pub success: bool,
    /// Reply on success
    pub response: Option<BotReply>,
    /// Classified error text on failure
    pub error: Option<String>,
    /// Session the message belonged to
    pub session_id: SessionId,
}

/// Result of a clear-session request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearSessionResult {
    /// Always true; clearing is best effort
    pub success: bool,
}

/// Result of a history request
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryResult {
    /// Always true; failures yield an empty history
    pub success: bool,
    /// Session the history belongs to
    pub session_id: SessionId,
    /// Raw history entries returned by the backend
    pub history: Vec<Value>,
}

/// Result of a configuration push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSyncResult {
    /// Whether the backend accepted the document
    pub success: bool,
    /// Classified error text on failure
    pub error: Option<String>,
}

/// Everything the bridge can deliver to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// Reply to [`Bridge::send_message`]
    MessageResult(SendMessageResult),
    /// Reply to [`Bridge::clear_session`]
    SessionCleared(ClearSessionResult),
    /// Reply to [`Bridge::get_history`]
    History(HistoryResult),
    /// Reply to [`Bridge::push_config`]
    ConfigSynced(ConfigSyncResult),
    /// Menu notification
    Notification(Notification),
}

/// Runs transport calls off the UI thread
pub struct Bridge {
    runtime: Runtime,
    transport: Arc<dyn TransportClient>,
    event_tx: Sender<BridgeEvent>,
    event_rx: Receiver<BridgeEvent>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl Bridge {
    /// Create a bridge with its own runtime
    pub fn new(transport: Arc<dyn TransportClient>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("chat-desk-bridge")
            .enable_all()
            .build()?;
        let (event_tx, event_rx) = mpsc::channel();

        info!("Bridge runtime started");

        Ok(Self {
            runtime,
            transport,
            event_tx,
            event_rx,
            waker: Arc::new(Mutex::new(None)),
        })
    }

    /// Install the callback invoked whenever an event is queued
    pub fn set_waker(&self, waker: Waker) {
        if let Ok(mut slot) = self.waker.lock() {
            *slot = Some(waker);
        }
    }

    /// Send a message; answered by [`BridgeEvent::MessageResult`]
    pub fn send_message(&self, message: String, session_id: SessionId) {
        let transport = Arc::clone(&self.transport);
        let outbox = self.outbox();

        self.runtime.spawn(async move {
            let result = match transport.send_message(&message, &session_id).await {
                Ok(response) => SendMessageResult {
                    success: true,
                    response: Some(response),
                    error: None,
                    session_id,
                },
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Chat request failed");
                    SendMessageResult {
                        success: false,
                        response: None,
                        error: Some(e.to_string()),
                        session_id,
                    }
                }
            };
            outbox.deliver(BridgeEvent::MessageResult(result));
        });
    }

    /// Clear a session; answered by [`BridgeEvent::SessionCleared`]
    pub fn clear_session(&self, session_id: SessionId) {
        let transport = Arc::clone(&self.transport);
        let outbox = self.outbox();

        self.runtime.spawn(async move {
            transport.clear_session(&session_id).await;
            outbox.deliver(BridgeEvent::SessionCleared(ClearSessionResult {
                success: true,
            }));
        });
    }

    /// Fetch remote history; answered by [`BridgeEvent::History`]
    pub fn get_history(&self, session_id: SessionId) {
        let transport = Arc::clone(&self.transport);
        let outbox = self.outbox();

        self.runtime.spawn(async move {
            let history = transport.get_chat_history(&session_id).await;
            outbox.deliver(BridgeEvent::History(HistoryResult {
                success: true,
                session_id,
                history,
            }));
        });
    }

    /// Push a configuration document; answered by [`BridgeEvent::ConfigSynced`]
    pub fn push_config(&self, document: Value) {
        let transport = Arc::clone(&self.transport);
        let outbox = self.outbox();

        self.runtime.spawn(async move {
            let result = match transport.push_config(&document).await {
                Ok(()) => ConfigSyncResult {
                    success: true,
                    error: None,
                },
                Err(e) => {
                    warn!(error = %e, "Server configuration push failed");
                    ConfigSyncResult {
                        success: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            outbox.deliver(BridgeEvent::ConfigSynced(result));
        });
    }

    /// Point the transport at a different chat endpoint
    pub fn set_api_endpoint(&self, endpoint: &str) {
        info!(endpoint = %endpoint, "Chat endpoint changed");
        self.transport.set_api_endpoint(endpoint);
    }

    /// Publish a menu notification
    pub fn notify(&self, notification: Notification) {
        self.outbox()
            .deliver(BridgeEvent::Notification(notification));
    }

    /// Next queued event, if any
    pub fn try_next(&self) -> Option<BridgeEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn next_timeout(&self, timeout: Duration) -> Option<BridgeEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn outbox(&self) -> Outbox {
        Outbox {
            tx: self.event_tx.clone(),
            waker: Arc::clone(&self.waker),
        }
    }
}

struct Outbox {
    tx: Sender<BridgeEvent>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl Outbox {
    fn deliver(&self, event: BridgeEvent) {
        if self.tx.send(event).is_err() {
            debug!("Bridge receiver dropped; event discarded");
            return;
        }
        let waker = self.waker.lock().ok().and_then(|slot| slot.clone());
        if let Some(wake) = waker {
            wake();
        }
    }
}
