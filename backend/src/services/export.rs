//! Transcript export service
//!
//! Renders a conversation as plain text, one `[HH:MM] Sender: text` block
//! per message, and writes it to disk.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use thiserror::Error;
use tracing::info;

use crate::chat::models::{Message, Sender};

/// Separator between message blocks
const BLOCK_SEPARATOR: &str = "\n\n";

/// Error types for transcript export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing but the welcome message to export
    #[error("No messages to export")]
    Empty,

    /// Writing the file failed
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// A rendered transcript and its suggested file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// `chat-export-{epoch-ms}.txt`
    pub file_name: String,
    /// Rendered text
    pub contents: String,
}

impl Transcript {
    /// Render `messages` in local time
    ///
    /// # Returns
    /// * `Err(ExportError::Empty)` - If the conversation holds only its greeting
    pub fn from_messages(messages: &[Message], now: DateTime<Utc>) -> Result<Self, ExportError> {
        if messages.len() <= 1 {
            return Err(ExportError::Empty);
        }
        Ok(Self {
            file_name: export_file_name(now),
            contents: render_transcript(messages, &Local),
        })
    }
}

/// One parsed transcript block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// `HH:MM`
    pub time: String,
    /// Author
    pub sender: Sender,
    /// Message text
    pub text: String,
}

/// Suggested export file name for `now`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("chat-export-{}.txt", now.timestamp_millis())
}

/// Format a timestamp as `HH:MM` in `tz`
pub fn format_clock<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

/// Render messages as transcript text with times in `tz`
pub fn render_transcript<Tz>(messages: &[Message], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    messages
        .iter()
        .map(|message| {
            format!(
                "[{}] {}: {}",
                format_clock(message.timestamp, tz),
                message.sender.transcript_label(),
                message.text
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Read transcript text back into entries
///
/// Blocks that do not start with a `[HH:MM] Sender:` header are treated as
/// paragraphs of the previous message.
pub fn parse_transcript(contents: &str) -> Vec<TranscriptEntry> {
    let mut entries: Vec<TranscriptEntry> = Vec::new();
    for block in contents.split(BLOCK_SEPARATOR) {
        match parse_header(block) {
            Some(entry) => entries.push(entry),
            None => {
                if let Some(last) = entries.last_mut() {
                    last.text.push_str(BLOCK_SEPARATOR);
                    last.text.push_str(block);
                }
            }
        }
    }
    entries
}

fn parse_header(block: &str) -> Option<TranscriptEntry> {
    let rest = block.strip_prefix('[')?;
    let (time, rest) = rest.split_once("] ")?;
    let valid_time = time.len() == 5
        && time
            .char_indices()
            .all(|(i, c)| if i == 2 { c == ':' } else { c.is_ascii_digit() });
    if !valid_time {
        return None;
    }

    let (sender, text) = [Sender::User, Sender::Bot].into_iter().find_map(|sender| {
        rest.strip_prefix(sender.transcript_label())
            .and_then(|r| r.strip_prefix(": "))
            .map(|text| (sender, text))
    })?;

    Some(TranscriptEntry {
        time: time.to_string(),
        sender,
        text: text.to_string(),
    })
}

/// Write a transcript to `path`, creating parent directories
pub fn write_transcript_to(path: &Path, transcript: &Transcript) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, transcript.contents.as_bytes()).map_err(io_err)?;
    info!(path = %path.display(), "Chat exported");
    Ok(())
}

/// Write a transcript under `dir` using its suggested file name
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written file
pub fn write_transcript(dir: &Path, transcript: &Transcript) -> Result<PathBuf, ExportError> {
    let path = dir.join(&transcript.file_name);
    write_transcript_to(&path, transcript)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use tempfile::TempDir;

    fn at(text: &str, sender: Sender, rfc3339: &str) -> Message {
        let timestamp = DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc);
        Message::at(text, sender, timestamp)
    }

    fn sample() -> Vec<Message> {
        vec![
            at("Welcome!", Sender::Bot, "2024-03-01T09:00:00Z"),
            at("Show me all projects", Sender::User, "2024-03-01T09:05:00Z"),
            at("Here they are:\n\n1. Alpha\n2. Beta", Sender::Bot, "2024-03-01T09:06:30Z"),
        ]
    }

    #[test]
    fn test_file_name() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(export_file_name(now), "chat-export-1709283600000.txt");
    }

    #[test]
    fn test_render_uses_labels_and_timezone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let text = render_transcript(&sample()[..2], &tz);
        assert_eq!(
            text,
            "[11:00] Assistant: Welcome!\n\n[11:05] You: Show me all projects"
        );
    }

    #[test]
    fn test_export_then_parse() {
        let text = render_transcript(&sample(), &Utc);
        let entries = parse_transcript(&text);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sender, Sender::Bot);
        assert_eq!(entries[1].sender, Sender::User);
        assert_eq!(entries[1].time, "09:05");
        assert_eq!(entries[2].time, "09:06");
        assert_eq!(entries[2].text, "Here they are:\n\n1. Alpha\n2. Beta");
    }

    #[test]
    fn test_parse_ignores_leading_noise() {
        let entries = parse_transcript("garbage\n\n[12:3x] You: nope\n\n[12:30] You: yes");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "yes");
    }

    #[test]
    fn test_welcome_only_is_empty() {
        let messages = vec![Message::bot("Welcome!")];
        assert!(matches!(
            Transcript::from_messages(&messages, Utc::now()),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn test_write_transcript() {
        let temp_dir = TempDir::new().unwrap();
        let transcript = Transcript::from_messages(&sample(), Utc::now()).unwrap();

        let path = write_transcript(&temp_dir.path().join("exports"), &transcript).unwrap();

        assert!(path.ends_with(&transcript.file_name));
        assert_eq!(fs::read_to_string(path).unwrap(), transcript.contents);
    }
}
