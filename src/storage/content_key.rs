//! Content-addressed container names.

use crate::config::CONTAINER_EXTENSION;
use sha2::{Digest, Sha256};
use std::fmt;

/// File name of a user's container: lowercase hex SHA-256 of the identity
/// plus the container extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    /// Derive the key for `identity` with the default `.wav` extension.
    pub fn for_identity(identity: &str) -> Self {
        Self::with_extension(identity, CONTAINER_EXTENSION)
    }

    /// Derive the key for `identity` with a custom extension.
    pub fn with_extension(identity: &str, extension: &str) -> Self {
        let digest = Sha256::digest(identity.as_bytes());
        Self(format!("{}.{}", hex::encode(digest), extension))
    }

    /// The key as a file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for ContentKey {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
