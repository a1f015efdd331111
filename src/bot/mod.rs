//! Conversation layer: turns incoming events into store operations.
//!
//! ```text
//! EventSource → Consumer → Processor ─┬→ FileStore
//!                              │      └→ Replier
//!                              └→ SessionStore
//! ```
//!
//! Events are processed one at a time, in arrival order, by a single
//! consumer. Session state and the file store are therefore never touched
//! concurrently.

mod consumer;
mod events;
mod local;
pub mod messages;
mod processor;
mod session;

pub use consumer::Consumer;
pub use events::{AudioResolver, Command, Event, EventProcessor, EventSource, Meta, Replier};
pub use local::{ConsoleReplier, JsonLinesSource, PassthroughResolver};
pub use processor::Processor;
pub use session::{MemorySessionStore, SessionState, SessionStore};
