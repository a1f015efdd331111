//! Audio Stego Store
//!
//! A per-user store of uploaded WAV files that hides short text messages in
//! the least significant bits of the sample data and reads them back.
//!
//! # Features
//!
//! - **Content addressing**: each user's upload lives at a path derived from
//!   a SHA-256 digest of their identity
//! - **Header-preserving codec**: the 44-byte WAV header is kept verbatim,
//!   only the payload is touched
//! - **LSB embedding**: one message bit per payload byte, terminated by `0x00`
//! - **Conversation state machine**: drives upload, hide, extract and cleanup
//!   from a stream of chat events
//!
//! # Architecture
//!
//! ```text
//! Event → Processor → FileStore → Container::parse → embed/extract → Container::to_bytes
//!            ↓
//!         Replier
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use audio_stego_store::encoding::extract;
//! use audio_stego_store::storage::{FileSource, FileStore};
//!
//! let store = FileStore::open("./files_storage").unwrap();
//! store.download(&FileSource::new(), "song.wav", "alice").unwrap();
//!
//! let path = store.prepare_hidden_file("alice", b"meet at noon").unwrap();
//! let container = store.read_decoded("alice").unwrap();
//! assert_eq!(extract(&container.payload), b"meet at noon");
//! # let _ = path;
//! ```

pub mod bot;
pub mod config;
pub mod encoding;
pub mod error;
pub mod storage;

pub use config::{BotConfig, StoreConfig};
pub use error::{Error, Result};
pub use storage::FileStore;
