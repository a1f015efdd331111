//! Per-user container storage.
//!
//! This module handles:
//! - Deriving the on-disk name of a user's container
//! - Fetching uploaded audio from an external byte source
//! - Embedding into and reading back the stored container

mod content_key;
mod file_store;
mod source;

pub use content_key::ContentKey;
pub use file_store::{validate_identity, FileStore};
pub use source::{AutoSource, ByteSource, FileSource, HttpSource};
