//! Local collaborators: replay events from a script and print replies.

use crate::bot::events::{AudioResolver, Event, EventSource, Meta, Replier};
use crate::error::{Error, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One line of an event script.
///
/// ```json
/// {"kind": "audio", "chat_id": 1, "user": "alice", "audio": "song.wav"}
/// {"kind": "message", "chat_id": 1, "user": "alice", "text": "/hide"}
/// ```
#[derive(Debug, Deserialize)]
struct ScriptLine {
    kind: String,
    chat_id: Option<i64>,
    user: Option<String>,
    #[serde(default)]
    text: String,
    audio: Option<String>,
}

impl ScriptLine {
    fn meta(&self) -> Result<Meta> {
        match (self.chat_id, &self.user) {
            (Some(chat_id), Some(user)) => Ok(Meta::new(chat_id, user.as_str())),
            _ => Err(Error::UnknownMetaType(format!(
                "{} event without chat_id and user",
                self.kind
            ))),
        }
    }

    fn into_event(self) -> Result<Event> {
        match self.kind.as_str() {
            "message" => Ok(Event::Message {
                meta: self.meta()?,
                text: self.text,
            }),
            "audio" => {
                let meta = self.meta()?;
                let audio = self.audio.ok_or_else(|| {
                    Error::Serialization("audio event without audio reference".to_string())
                })?;
                Ok(Event::Audio { meta, audio })
            }
            _ => Ok(Event::Unknown { kind: self.kind }),
        }
    }
}

/// Event source backed by a JSON-lines script, one event per line.
///
/// The cursor only moves forward, so repeated fetches resume where the last
/// one stopped. Lines that cannot be turned into an event are logged and
/// skipped.
#[derive(Debug)]
pub struct JsonLinesSource {
    lines: Vec<String>,
    cursor: usize,
}

impl JsonLinesSource {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_script(&content))
    }

    pub fn from_script(script: &str) -> Self {
        let lines = script
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { lines, cursor: 0 }
    }

    /// Events not yet fetched.
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor
    }

    fn parse(line: &str) -> Result<Event> {
        serde_json::from_str::<ScriptLine>(line)?.into_event()
    }
}

impl EventSource for JsonLinesSource {
    fn fetch(&mut self, limit: usize) -> Result<Vec<Event>> {
        let end = self.cursor.saturating_add(limit).min(self.lines.len());
        let mut events = Vec::with_capacity(end - self.cursor);

        for (offset, line) in self.lines[self.cursor..end].iter().enumerate() {
            match Self::parse(line) {
                Ok(event) => events.push(event),
                Err(e) => warn!("skipping event {}: {}", self.cursor + offset + 1, e),
            }
        }

        self.cursor = end;
        Ok(events)
    }
}

/// Prints replies to stdout, copying delivered audio into `outbox` when set.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReplier {
    outbox: Option<PathBuf>,
}

impl ConsoleReplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outbox(outbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: Some(outbox.into()),
        }
    }
}

impl Replier for ConsoleReplier {
    fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        println!("[chat {}] {}", chat_id, text);
        Ok(())
    }

    fn send_audio(&self, chat_id: i64, path: &Path) -> Result<()> {
        let Some(outbox) = &self.outbox else {
            println!("[chat {}] <audio {}>", chat_id, path.display());
            return Ok(());
        };

        let name = path
            .file_name()
            .ok_or_else(|| Error::Delivery(format!("not a file: {}", path.display())))?;
        let target = outbox.join(format!("{}-{}", chat_id, name.to_string_lossy()));

        std::fs::create_dir_all(outbox)?;
        std::fs::copy(path, &target).map_err(|e| Error::Delivery(e.to_string()))?;

        println!("[chat {}] <audio {}>", chat_id, target.display());
        Ok(())
    }
}

/// Uses the audio token itself as the fetch location.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl AudioResolver for PassthroughResolver {
    fn resolve(&self, token: &str) -> Result<String> {
        Ok(token.to_string())
    }
}
