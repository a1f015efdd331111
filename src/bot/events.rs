//! Event types and the collaborator traits around the processor.

use crate::error::Result;
use std::path::Path;

/// Who sent an event and where to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    /// Chat the reply goes to.
    pub chat_id: i64,
    /// Sender identity; keys both session state and storage.
    pub identity: String,
}

impl Meta {
    pub fn new(chat_id: i64, identity: impl Into<String>) -> Self {
        Self {
            chat_id,
            identity: identity.into(),
        }
    }
}

/// An incoming event, carrying only the fields its kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Plain text or a command.
    Message { meta: Meta, text: String },
    /// An audio upload, referenced by an opaque token.
    Audio { meta: Meta, audio: String },
    /// Anything the source could not classify.
    Unknown { kind: String },
}

impl Event {
    pub fn message(chat_id: i64, identity: &str, text: &str) -> Self {
        Event::Message {
            meta: Meta::new(chat_id, identity),
            text: text.to_string(),
        }
    }

    pub fn audio(chat_id: i64, identity: &str, audio: &str) -> Self {
        Event::Audio {
            meta: Meta::new(chat_id, identity),
            audio: audio.to_string(),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &str {
        match self {
            Event::Message { .. } => "message",
            Event::Audio { .. } => "audio",
            Event::Unknown { kind } => kind,
        }
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Event::Message { meta, .. } | Event::Audio { meta, .. } => Some(meta),
            Event::Unknown { .. } => None,
        }
    }
}

/// A parsed text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Begin the hide workflow.
    Hide,
    Extract,
    /// Leave the hide workflow.
    Cancel,
    /// Report how much text the uploaded audio can hold.
    Capacity,
    /// Anything else; the text to hide while a hide is pending.
    Text(String),
}

impl Command {
    pub const START: &'static str = "/start";
    pub const HELP: &'static str = "/help";
    pub const HIDE: &'static str = "/hide";
    pub const EXTRACT: &'static str = "/extract";
    pub const CANCEL: &'static str = "/cancel";
    pub const CAPACITY: &'static str = "/capacity";

    /// Parse a message, ignoring surrounding whitespace.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text {
            Self::START => Command::Start,
            Self::HELP => Command::Help,
            Self::HIDE => Command::Hide,
            Self::EXTRACT => Command::Extract,
            Self::CANCEL => Command::Cancel,
            Self::CAPACITY => Command::Capacity,
            other => Command::Text(other.to_string()),
        }
    }
}

/// Source of events, restartable through its own cursor.
pub trait EventSource {
    /// Return up to `limit` pending events in arrival order.
    fn fetch(&mut self, limit: usize) -> Result<Vec<Event>>;
}

/// Handles one event at a time.
pub trait EventProcessor {
    fn process(&mut self, event: Event) -> Result<()>;
}

/// Delivers replies to a chat.
pub trait Replier {
    fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send a local file as an audio attachment.
    fn send_audio(&self, chat_id: i64, path: &Path) -> Result<()>;
}

/// Resolves an audio token to a location a `ByteSource` can fetch.
pub trait AudioResolver {
    fn resolve(&self, token: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/hide"), Command::Hide);
        assert_eq!(Command::parse("  /extract \n"), Command::Extract);
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/cancel"), Command::Cancel);
        assert_eq!(Command::parse("/capacity"), Command::Capacity);
    }

    #[test]
    fn test_parse_text_is_trimmed() {
        assert_eq!(Command::parse("  hi there "), Command::Text("hi there".into()));
        assert_eq!(Command::parse("/HIDE"), Command::Text("/HIDE".into()));
    }

    #[test]
    fn test_event_kind_and_meta() {
        let event = Event::audio(7, "alice", "file-1");
        assert_eq!(event.kind(), "audio");
        assert_eq!(event.meta(), Some(&Meta::new(7, "alice")));

        let unknown = Event::Unknown {
            kind: "sticker".into(),
        };
        assert_eq!(unknown.kind(), "sticker");
        assert!(unknown.meta().is_none());
    }
}
