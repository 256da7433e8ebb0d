//! HTTP transport to the local chat backend
//!
//! Thin wrapper around `reqwest` that enforces the message preconditions,
//! applies per-call timeouts and classifies failures into [`ChatError`].

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{config_endpoint, ChatConfig};
use crate::error::{validate_message, ChatError};

/// Body returned by the chat backend
#[derive(Debug, Clone, PartialEq)]
pub enum BotReply {
    /// Plain text (or a JSON string)
    Text(String),
    /// Any other JSON document
    Structured(Value),
}

impl BotReply {
    /// Interpret a raw response body
    ///
    /// JSON strings are unwrapped, JSON objects and arrays are kept
    /// structured, everything else is taken verbatim.
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::String(text)) => BotReply::Text(text),
            Ok(value @ (Value::Object(_) | Value::Array(_))) => BotReply::Structured(value),
            _ => BotReply::Text(body),
        }
    }

    /// Text to show in the conversation, pretty-printing structured replies
    pub fn display_text(&self) -> String {
        match self {
            BotReply::Text(text) => text.clone(),
            BotReply::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Port to the chat backend
///
/// Implemented over HTTP by [`HttpTransport`]; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Send a message and return the backend's reply
    async fn send_message(&self, message: &str, session_id: &str) -> Result<BotReply, ChatError>;

    /// Forget a session on the backend; never fails
    async fn clear_session(&self, session_id: &str);

    /// Fetch a session's remote history; empty on any failure
    async fn get_chat_history(&self, session_id: &str) -> Vec<Value>;

    /// Push a configuration document to the backend
    async fn push_config(&self, document: &Value) -> Result<(), ChatError>;

    /// Point the transport at a different chat endpoint
    fn set_api_endpoint(&self, _endpoint: &str) {}
}

/// [`TransportClient`] talking to the backend over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: RwLock<String>,
    send_timeout: Duration,
    history_timeout: Duration,
    config_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with its own HTTP client
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a transport sharing an existing HTTP client (connection pooling)
    pub fn with_client(client: reqwest::Client, config: &ChatConfig) -> Self {
        Self {
            client,
            endpoint: RwLock::new(config.api_endpoint.clone()),
            send_timeout: config.send_timeout(),
            history_timeout: config.history_timeout(),
            config_timeout: config.config_timeout(),
        }
    }

    /// Endpoint messages are currently sent to
    pub fn api_endpoint(&self) -> String {
        self.endpoint
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn send_message(&self, message: &str, session_id: &str) -> Result<BotReply, ChatError> {
        let message = validate_message(message)?;
        let endpoint = self.api_endpoint();

        debug!(
            endpoint = %endpoint,
            session_id = %session_id,
            message_len = message.len(),
            "Sending chat message"
        );

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .timeout(self.send_timeout)
            .body(message.to_string())
            .send()
            .await
            .map_err(|e| ChatError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::from_status(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::from_transport(&e))?;

        debug!(
            session_id = %session_id,
            status = status.as_u16(),
            body_len = body.len(),
            "Chat backend replied"
        );

        Ok(BotReply::from_body(body))
    }

    async fn clear_session(&self, session_id: &str) {
        // No clear route on the backend
        debug!(session_id = %session_id, "Session cleared");
    }

    async fn get_chat_history(&self, session_id: &str) -> Vec<Value> {
        let url = format!(
            "{}/history/{}",
            self.api_endpoint().trim_end_matches('/'),
            session_id
        );

        let result = async {
            let response = self
                .client
                .get(&url)
                .timeout(self.history_timeout)
                .send()
                .await
                .map_err(|e| ChatError::from_transport(&e))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ChatError::from_status(status.as_u16(), &body));
            }
            response
                .json::<Value>()
                .await
                .map_err(|e| ChatError::Other(e.to_string()))
        }
        .await;

        match result {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                debug!(session_id = %session_id, "History response is not a list: {}", other);
                Vec::new()
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Error getting chat history");
                Vec::new()
            }
        }
    }

    async fn push_config(&self, document: &Value) -> Result<(), ChatError> {
        let url = config_endpoint(&self.api_endpoint())?;

        debug!(url = %url, "Pushing server configuration");

        let response = self
            .client
            .post(&url)
            .timeout(self.config_timeout)
            .json(document)
            .send()
            .await
            .map_err(|e| ChatError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::from_status(status.as_u16(), &body));
        }
        Ok(())
    }

    fn set_api_endpoint(&self, endpoint: &str) {
        let mut guard = self
            .endpoint
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = endpoint.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;
    use std::io::Write;

    fn transport_for(base_url: &str, send_timeout_secs: u64) -> HttpTransport {
        let config = ChatConfig {
            api_endpoint: format!("{}/api/chat", base_url),
            send_timeout_secs,
            ..ChatConfig::default()
        };
        HttpTransport::new(&config)
    }

    #[test]
    fn test_reply_from_plain_text() {
        assert_eq!(
            BotReply::from_body("plain answer".to_string()),
            BotReply::Text("plain answer".to_string())
        );
    }

    #[test]
    fn test_reply_from_json_string_is_unwrapped() {
        assert_eq!(
            BotReply::from_body("\"quoted\"".to_string()),
            BotReply::Text("quoted".to_string())
        );
    }

    #[test]
    fn test_structured_reply_is_pretty_printed() {
        let reply = BotReply::from_body(r#"{"projects":[1,2]}"#.to_string());
        assert!(matches!(reply, BotReply::Structured(_)));
        let text = reply.display_text();
        assert!(text.contains('\n'));
        assert!(text.contains("\"projects\""));
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_posts_trimmed_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("content-type", "application/json")
            .match_header("accept", "*/*")
            .match_body("show me all projects")
            .with_status(200)
            .with_body("Here you go")
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        let reply = transport
            .send_message("  show me all projects \n", "chat_1_abc")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, BotReply::Text("Here you go".to_string()));
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_validation_skips_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .expect(0)
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        let empty = transport.send_message("   ", "s").await.unwrap_err();
        let long = transport
            .send_message(&"z".repeat(2001), "s")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(empty, ChatError::EmptyMessage);
        assert!(long.is_validation());
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_classifies_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(429)
            .with_body(r#"{"message": "slow down"}"#)
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        let err = transport.send_message("hello", "s").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            err.to_string(),
            "Too Many Requests: Rate limit exceeded - slow down"
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_send_message_timeout() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(b"too late")
            })
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 1);
        let err = transport.send_message("hello", "s").await.unwrap_err();
        assert_eq!(err, ChatError::Timeout);
    }

    #[tokio::test]
    async fn test_send_message_unreachable() {
        let transport = transport_for("http://127.0.0.1:9", 5);
        let err = transport.send_message("hello", "s").await.unwrap_err();
        assert_eq!(err, ChatError::Network);
        assert_eq!(err.to_string(), "Network Error: Unable to reach the server");
    }

    #[tokio::test]
    #[serial]
    async fn test_get_chat_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/chat/history/chat_1_abc")
            .with_status(200)
            .with_body(r#"[{"role":"user","text":"hi"}]"#)
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        let history = transport.get_chat_history("chat_1_abc").await;

        mock.assert_async().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["text"], "hi");
    }

    #[tokio::test]
    #[serial]
    async fn test_get_chat_history_failure_is_empty() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/api/chat/history/.*$".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        assert!(transport.get_chat_history("missing").await.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_push_config_targets_config_api() {
        let mut server = Server::new_async().await;
        let document = json!({"mcpServers": {"docs": {"url": "http://docs", "name": "Docs", "description": ""}}});
        let mock = server
            .mock("POST", "/api/config")
            .match_body(Matcher::Json(document.clone()))
            .with_status(200)
            .create_async()
            .await;

        let transport = transport_for(&server.url(), 60);
        transport.push_config(&document).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_set_api_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/other/chat")
            .with_status(200)
            .with_body("moved")
            .create_async()
            .await;

        let transport = transport_for("http://127.0.0.1:9", 60);
        transport.set_api_endpoint(&format!("{}/other/chat", server.url()));
        let reply = transport.send_message("ping", "s").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.display_text(), "moved");
    }
}
