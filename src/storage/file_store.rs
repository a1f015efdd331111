//! File-backed container store: one container per user at
//! `root/<identity>/<content key>`.

use crate::config::StoreConfig;
use crate::encoding::{capacity_for, embed, Container};
use crate::error::{Error, Result};
use crate::storage::content_key::ContentKey;
use crate::storage::source::ByteSource;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check that an identity is safe to use as a directory name under the root.
pub fn validate_identity(identity: &str) -> Result<()> {
    let invalid = identity.is_empty()
        || identity.starts_with('.')
        || identity.contains(['/', '\\', '\0']);

    if invalid {
        return Err(Error::InvalidIdentity(identity.to_string()));
    }
    Ok(())
}

/// Store of uploaded audio containers keyed by user identity.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Create a store from a validated configuration.
    ///
    /// The root directory is created lazily on the first upload.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a store with the default layout under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(root))
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Layout this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Content key of `identity`'s container.
    pub fn key_for(&self, identity: &str) -> ContentKey {
        ContentKey::with_extension(identity, &self.config.extension)
    }

    /// Deterministic path of `identity`'s container.
    pub fn path_for(&self, identity: &str) -> Result<PathBuf> {
        validate_identity(identity)?;
        Ok(self.user_dir(identity).join(self.key_for(identity)))
    }

    fn user_dir(&self, identity: &str) -> PathBuf {
        self.config.root.join(identity)
    }

    /// Whether a container is stored for `identity`.
    pub fn exists(&self, identity: &str) -> Result<bool> {
        let path = self.path_for(identity)?;

        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Fetch `location` from `source` and store it as `identity`'s container,
    /// replacing any previous upload.
    pub fn download(
        &self,
        source: &dyn ByteSource,
        location: &str,
        identity: &str,
    ) -> Result<PathBuf> {
        validate_identity(identity)?;
        let bytes = source.fetch(location)?;
        let path = self.save(identity, &bytes)?;

        info!("stored {} bytes of audio for '{}'", bytes.len(), identity);
        Ok(path)
    }

    /// Store raw container bytes for `identity`, replacing any previous file.
    pub fn save(&self, identity: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(identity)?;
        fs::create_dir_all(self.user_dir(identity))?;
        write_atomic(&path, bytes)?;
        Ok(path)
    }

    /// Hide `message` in `identity`'s container and rewrite it in place.
    ///
    /// Returns the container path for delivery.
    pub fn prepare_hidden_file(&self, identity: &str, message: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(identity)?;
        let container = self.read_decoded(identity)?;

        let payload = embed(&container.payload, message)?;
        let updated = Container::from_parts(container.header, payload);
        write_atomic(&path, &updated.to_bytes())?;

        debug!(
            "embedded {} bytes into container of '{}'",
            message.len(),
            identity
        );
        Ok(path)
    }

    /// Read and split `identity`'s container.
    pub fn read_decoded(&self, identity: &str) -> Result<Container> {
        let path = self.path_for(identity)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(identity.to_string()))
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Container::parse_with_header(&bytes, self.config.header_size)
    }

    /// Largest message, in bytes, that `identity`'s container can hold.
    pub fn capacity(&self, identity: &str) -> Result<usize> {
        let container = self.read_decoded(identity)?;
        Ok(capacity_for(container.payload.len()))
    }

    /// Delete `identity`'s container. Fails if there is none.
    pub fn remove(&self, identity: &str) -> Result<()> {
        let path = self.path_for(identity)?;
        fs::remove_file(&path)?;

        debug!("removed container {}", path.display());
        Ok(())
    }

    /// Identities that currently hold a container, sorted.
    pub fn stored_identities(&self) -> Result<Vec<String>> {
        if !self.config.root.exists() {
            return Ok(Vec::new());
        }

        let mut identities = Vec::new();

        for entry in WalkDir::new(&self.config.root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let identity = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str());

            // Skip temp files and anything not named by its owner's key
            if let Some(identity) = identity {
                if entry.file_name() == self.key_for(identity).as_str() {
                    identities.push(identity.to_string());
                }
            }
        }

        identities.sort();
        Ok(identities)
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");

    let mut file = File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEADER_SIZE;
    use crate::encoding::extract;
    use crate::storage::FileSource;
    use tempfile::TempDir;

    fn wav(payload_len: usize) -> Vec<u8> {
        let mut bytes = vec![0x52u8; HEADER_SIZE];
        bytes.extend((0..payload_len).map(|i| (i % 251) as u8));
        bytes
    }

    fn store(dir: &TempDir) -> FileStore {
        FileStore::open(dir.path().join("storage")).unwrap()
    }

    #[test]
    fn test_path_layout() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let path = store.path_for("alice").unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("storage")
                .join("alice")
                .join(ContentKey::for_identity("alice").as_str())
        );
    }

    #[test]
    fn test_invalid_identities_rejected() {
        for id in ["", ".", "..", ".hidden", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_identity(id), Err(Error::InvalidIdentity(_))),
                "{:?} should be rejected",
                id
            );
        }
        assert!(validate_identity("alice_01").is_ok());
    }

    #[test]
    fn test_exists_and_save() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(!store.exists("alice").unwrap());
        store.save("alice", &wav(100)).unwrap();
        assert!(store.exists("alice").unwrap());
        assert!(!store.exists("bob").unwrap());
    }

    #[test]
    fn test_download_overwrites_previous_upload() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(dir.path().join("first.wav"), wav(10)).unwrap();
        std::fs::write(dir.path().join("second.wav"), wav(20)).unwrap();
        let source = FileSource::with_base(dir.path());

        store.download(&source, "first.wav", "alice").unwrap();
        let path = store.download(&source, "second.wav", "alice").unwrap();

        assert_eq!(std::fs::read(path).unwrap(), wav(20));
        assert!(!store.path_for("alice").unwrap().with_extension("tmp").exists());
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let source = FileSource::with_base(dir.path());

        assert!(store.download(&source, "missing.wav", "alice").is_err());
        assert!(!store.exists("alice").unwrap());
    }

    #[test]
    fn test_prepare_hidden_file_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let original = wav(500);
        store.save("alice", &original).unwrap();

        let path = store.prepare_hidden_file("alice", b"secret").unwrap();
        let bytes = std::fs::read(&path).unwrap();

        assert_eq!(bytes.len(), original.len());
        assert_eq!(&bytes[..HEADER_SIZE], &original[..HEADER_SIZE]);

        let container = store.read_decoded("alice").unwrap();
        assert_eq!(extract(&container.payload), b"secret");
    }

    #[test]
    fn test_prepare_without_upload() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let result = store.prepare_hidden_file("alice", b"hi");
        assert!(matches!(result, Err(Error::NotFound(id)) if id == "alice"));
    }

    #[test]
    fn test_prepare_capacity_exceeded_keeps_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let original = wav(16);
        store.save("alice", &original).unwrap();

        let result = store.prepare_hidden_file("alice", b"ab");

        assert!(matches!(result, Err(Error::CapacityExceeded { .. })));
        assert_eq!(std::fs::read(store.path_for("alice").unwrap()).unwrap(), original);
    }

    #[test]
    fn test_read_decoded_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("alice", &[0u8; 10]).unwrap();

        assert!(matches!(
            store.read_decoded("alice"),
            Err(Error::MalformedContainer { .. })
        ));
    }

    #[test]
    fn test_capacity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("alice", &wav(80)).unwrap();

        assert_eq!(store.capacity("alice").unwrap(), 9);
        assert!(matches!(store.capacity("bob"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("alice", &wav(10)).unwrap();

        store.remove("alice").unwrap();

        assert!(!store.exists("alice").unwrap());
        assert!(matches!(store.remove("alice"), Err(Error::Io(_))));
    }

    #[test]
    fn test_stored_identities() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.stored_identities().unwrap().is_empty());

        store.save("carol", &wav(10)).unwrap();
        store.save("alice", &wav(10)).unwrap();
        store.save("bob", &wav(10)).unwrap();
        store.remove("bob").unwrap();
        std::fs::write(store.root().join("carol").join("stray.txt"), b"x").unwrap();

        assert_eq!(store.stored_identities().unwrap(), vec!["alice", "carol"]);
    }
}
