//! Error types for the chat client
//!
//! `ChatError` covers everything that can go wrong between the user pressing
//! send and a reply arriving. Its `Display` output is the human-readable
//! classification of the failure; callers log it and fall back to a locally
//! generated reply instead of showing it.

use serde_json::Value;
use thiserror::Error;

use crate::chat::MAX_MESSAGE_CHARS;

/// Errors produced by message validation and the HTTP transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Message was empty after trimming
    #[error("User message cannot be empty")]
    EmptyMessage,

    /// Message exceeds the character limit
    #[error("Message is too long. Please keep it under {max} characters.")]
    MessageTooLong {
        /// Length of the rejected message in characters
        length: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Server answered with a non-success status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Classified message, including any server-supplied detail
        message: String,
    },

    /// Request did not complete within the configured timeout
    #[error("Request timeout: The server took too long to respond")]
    Timeout,

    /// Request was sent but no response was received
    #[error("Network Error: Unable to reach the server")]
    Network,

    /// Anything else, carrying the underlying error text
    #[error("{0}")]
    Other(String),
}

impl ChatError {
    /// Build the error for a non-success HTTP status
    ///
    /// A `message` field in a JSON error body is appended to the fixed text
    /// for the status family.
    pub fn from_status(status: u16, body: &str) -> Self {
        let mut message = match status {
            400 => "Bad Request: Invalid message format".to_string(),
            401 => "Unauthorized: Authentication required".to_string(),
            403 => "Forbidden: Access denied".to_string(),
            404 => "Not Found: Chat service unavailable".to_string(),
            429 => "Too Many Requests: Rate limit exceeded".to_string(),
            500 => "Internal Server Error: Please try again later".to_string(),
            502..=504 => "Service Unavailable: Please try again later".to_string(),
            other => format!("Server Error: {}", other),
        };

        if let Some(detail) = server_detail(body) {
            message.push_str(" - ");
            message.push_str(&detail);
        }

        ChatError::Http { status, message }
    }

    /// Classify a transport-level failure from reqwest
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ChatError::from_status(status.as_u16(), "");
        }
        if err.is_timeout() {
            ChatError::Timeout
        } else if err.is_connect() || err.is_request() {
            ChatError::Network
        } else {
            ChatError::Other(err.to_string())
        }
    }

    /// Whether this error was raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyMessage | ChatError::MessageTooLong { .. }
        )
    }
}

/// Validate an outgoing message and return it trimmed
///
/// The message must be non-empty after trimming and at most
/// [`MAX_MESSAGE_CHARS`] characters long.
pub fn validate_message(text: &str) -> Result<&str, ChatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    let length = trimmed.chars().count();
    if length > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong {
            length,
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(trimmed)
}

fn server_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("message")?.as_str()?;
    if detail.is_empty() {
        None
    } else {
        Some(detail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(
            ChatError::from_status(400, "").to_string(),
            "Bad Request: Invalid message format"
        );
        assert_eq!(
            ChatError::from_status(401, "").to_string(),
            "Unauthorized: Authentication required"
        );
        assert_eq!(
            ChatError::from_status(403, "").to_string(),
            "Forbidden: Access denied"
        );
        assert_eq!(
            ChatError::from_status(404, "").to_string(),
            "Not Found: Chat service unavailable"
        );
        assert_eq!(
            ChatError::from_status(429, "").to_string(),
            "Too Many Requests: Rate limit exceeded"
        );
        assert_eq!(
            ChatError::from_status(500, "").to_string(),
            "Internal Server Error: Please try again later"
        );
        for status in [502, 503, 504] {
            assert_eq!(
                ChatError::from_status(status, "").to_string(),
                "Service Unavailable: Please try again later"
            );
        }
        assert_eq!(
            ChatError::from_status(418, "").to_string(),
            "Server Error: 418"
        );
    }

    #[test]
    fn test_server_detail_is_appended() {
        let err = ChatError::from_status(500, r#"{"message": "model offline"}"#);
        assert_eq!(
            err.to_string(),
            "Internal Server Error: Please try again later - model offline"
        );
    }

    #[test]
    fn test_non_json_or_empty_detail_is_ignored() {
        let err = ChatError::from_status(404, "<html>not found</html>");
        assert_eq!(err.to_string(), "Not Found: Chat service unavailable");

        let err = ChatError::from_status(404, r#"{"message": ""}"#);
        assert_eq!(err.to_string(), "Not Found: Chat service unavailable");
    }

    #[test]
    fn test_validate_message_trims() {
        assert_eq!(validate_message("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn test_validate_message_rejects_blank() {
        assert_eq!(validate_message("").unwrap_err(), ChatError::EmptyMessage);
        assert_eq!(
            validate_message(" \t\n ").unwrap_err(),
            ChatError::EmptyMessage
        );
    }

    #[test]
    fn test_validate_message_length_bounds() {
        let at_limit = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let err = validate_message(&over_limit).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err,
            ChatError::MessageTooLong {
                length: MAX_MESSAGE_CHARS + 1,
                max: MAX_MESSAGE_CHARS
            }
        );
    }

    #[test]
    fn test_validate_message_counts_characters_not_bytes() {
        let wide = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&wide).is_ok());
    }
}
