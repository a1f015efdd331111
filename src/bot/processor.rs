//! The conversation state machine.

use crate::bot::events::{AudioResolver, Command, Event, EventProcessor, Meta, Replier};
use crate::bot::messages;
use crate::bot::session::{MemorySessionStore, SessionState, SessionStore};
use crate::encoding::extract;
use crate::error::{Error, Result};
use crate::storage::{ByteSource, FileStore};
use log::{debug, info};

/// Drives store operations from incoming events and per-user session state.
///
/// | state            | input            | action                              |
/// |------------------|------------------|-------------------------------------|
/// | any              | `/hide`          | → `AwaitingHideText`, ask for text  |
/// | `AwaitingHideText` | text           | embed, send audio, remove container |
/// | any              | `/extract`       | reply with the hidden text          |
/// | any              | audio upload     | download and store the container    |
/// | `Idle`           | text             | "unknown command"                   |
pub struct Processor {
    store: FileStore,
    replier: Box<dyn Replier>,
    resolver: Box<dyn AudioResolver>,
    source: Box<dyn ByteSource>,
    sessions: Box<dyn SessionStore>,
    reset_after_delivery: bool,
}

impl Processor {
    /// Create a processor with an in-memory session store.
    pub fn new(
        store: FileStore,
        replier: Box<dyn Replier>,
        resolver: Box<dyn AudioResolver>,
        source: Box<dyn ByteSource>,
    ) -> Self {
        Self {
            store,
            replier,
            resolver,
            source,
            sessions: Box::new(MemorySessionStore::new()),
            reset_after_delivery: true,
        }
    }

    /// Replace the session store.
    pub fn with_sessions(mut self, sessions: Box<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Whether a delivered hide returns the user to `Idle`.
    pub fn with_reset_after_delivery(mut self, reset: bool) -> Self {
        self.reset_after_delivery = reset;
        self
    }

    /// The container store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Current session state of `identity`.
    pub fn session(&self, identity: &str) -> SessionState {
        self.sessions.get(identity)
    }

    fn handle_message(&mut self, meta: &Meta, text: &str) -> Result<()> {
        let command = Command::parse(text);

        match &command {
            Command::Text(_) => debug!("got text from '{}'", meta.identity),
            cmd => info!("got command {:?} from '{}'", cmd, meta.identity),
        }

        match command {
            Command::Start => self.replier.send_text(meta.chat_id, &messages::hello()),
            Command::Help => self.replier.send_text(meta.chat_id, messages::MSG_HELP),
            Command::Hide => {
                self.sessions
                    .set(&meta.identity, SessionState::AwaitingHideText);
                self.replier.send_text(meta.chat_id, messages::MSG_SEND_TEXT)
            }
            Command::Cancel => {
                self.sessions.reset(&meta.identity);
                self.replier.send_text(meta.chat_id, messages::MSG_CANCELLED)
            }
            Command::Extract => {
                let result = self.extract(meta);
                self.answer(meta, result)
            }
            Command::Capacity => {
                let result = self.capacity(meta);
                self.answer(meta, result)
            }
            Command::Text(text) => match self.sessions.get(&meta.identity) {
                SessionState::AwaitingHideText => {
                    let result = self.hide(meta, &text);
                    self.answer(meta, result.map(|_| None))
                }
                SessionState::Idle => self
                    .replier
                    .send_text(meta.chat_id, messages::MSG_UNKNOWN_COMMAND),
            },
        }
    }

    fn extract(&self, meta: &Meta) -> Result<Option<String>> {
        let container = self.store.read_decoded(&meta.identity)?;
        let message = extract(&container.payload);
        Ok(Some(messages::extracted(&message)))
    }

    fn capacity(&self, meta: &Meta) -> Result<Option<String>> {
        let bytes = self.store.capacity(&meta.identity)?;
        Ok(Some(messages::capacity(bytes)))
    }

    /// Embed, deliver, then drop the stored container.
    fn hide(&mut self, meta: &Meta, text: &str) -> Result<()> {
        let path = self
            .store
            .prepare_hidden_file(&meta.identity, text.as_bytes())?;

        self.replier.send_audio(meta.chat_id, &path)?;
        self.store.remove(&meta.identity)?;

        if self.reset_after_delivery {
            self.sessions.reset(&meta.identity);
        }
        info!("delivered hidden audio to '{}'", meta.identity);
        Ok(())
    }

    /// Send the reply, or turn a user-facing error into one.
    fn answer(&self, meta: &Meta, result: Result<Option<String>>) -> Result<()> {
        match result {
            Ok(Some(reply)) => self.replier.send_text(meta.chat_id, &reply),
            Ok(None) => Ok(()),
            Err(e) if e.is_user_facing() => {
                debug!("answering '{}' with: {}", meta.identity, e);
                let reply = messages::for_error(&e).unwrap_or(messages::MSG_UNKNOWN_COMMAND);
                self.replier.send_text(meta.chat_id, reply)
            }
            Err(e) => Err(e),
        }
    }

    fn handle_audio(&mut self, meta: &Meta, token: &str) -> Result<()> {
        let location = self.resolver.resolve(token)?;
        let result = self
            .store
            .download(self.source.as_ref(), &location, &meta.identity)
            .map(|_| Some(messages::MSG_SAVED.to_string()));

        self.answer(meta, result)
    }
}

impl EventProcessor for Processor {
    fn process(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Message { meta, text } => self.handle_message(&meta, &text),
            Event::Audio { meta, audio } => self.handle_audio(&meta, &audio),
            Event::Unknown { kind } => Err(Error::UnknownEventType(kind)),
        }
    }
}
