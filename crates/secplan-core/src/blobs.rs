//! Blob storage for floorplan documents and equipment images
//!
//! The in-memory project model never holds binary content; floorplan
//! source documents and captured equipment photos live in a key-value
//! blob store addressed by the owning entity's id. Writes are
//! last-write-wins with no concurrency check.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A stored blob: content plus its original filename.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Original filename as provided at store time
    pub filename: String,
    /// Binary content
    pub bytes: Vec<u8>,
}

/// Sidecar metadata persisted next to each blob's content file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobMeta {
    filename: String,
    stored_at: DateTime<Utc>,
}

/// Key-value store for binary content.
///
/// Keys are entity ids (floorplan or image ids) rendered as strings.
pub trait BlobStore {
    /// Store content under a key, replacing any previous content.
    fn put(&self, key: &str, filename: &str, bytes: &[u8]) -> Result<()>;

    /// Fetch the blob stored under a key.
    fn get(&self, key: &str) -> Result<Blob>;

    /// Delete the blob stored under a key. Deleting an absent key is a
    /// no-op.
    fn delete(&self, key: &str) -> Result<()>;

    /// List every key currently stored.
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Whether a blob exists under a key.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }
}

/// Filesystem-backed blob store.
///
/// Layout: `<root>/<key>.bin` for content, `<root>/<key>.json` for the
/// filename sidecar. Keys are sanitized to reject path separators.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if needed) a store rooted at the given directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StorageError::RootUnavailable {
            root: root.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_key(key: &str) -> Result<()> {
        if key.is_empty() || key.contains(['/', '\\', '.']) {
            return Err(StorageError::Io {
                key: key.to_string(),
                reason: "invalid blob key".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn content_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.bin"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, filename: &str, bytes: &[u8]) -> Result<()> {
        Self::check_key(key)?;
        let meta = BlobMeta {
            filename: filename.to_string(),
            stored_at: Utc::now(),
        };
        let meta_json = serde_json::to_vec_pretty(&meta)?;
        fs::write(self.content_path(key), bytes).map_err(|e| StorageError::Io {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        fs::write(self.meta_path(key), meta_json).map_err(|e| StorageError::Io {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        debug!(key, filename, size = bytes.len(), "stored blob");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Blob> {
        Self::check_key(key)?;
        let content_path = self.content_path(key);
        if !content_path.exists() {
            return Err(StorageError::BlobNotFound {
                key: key.to_string(),
            }
            .into());
        }
        let bytes = fs::read(&content_path).map_err(|e| StorageError::Io {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let meta_bytes = fs::read(self.meta_path(key)).map_err(|e| StorageError::CorruptMetadata {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let meta: BlobMeta =
            serde_json::from_slice(&meta_bytes).map_err(|e| StorageError::CorruptMetadata {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Blob {
            filename: meta.filename,
            bytes,
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        Self::check_key(key)?;
        for path in [self.content_path(key), self.meta_path(key)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StorageError::Io {
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                    .into())
                }
            }
        }
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::RootUnavailable {
            root: self.root.display().to_string(),
            reason: e.to_string(),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::RootUnavailable {
                root: self.root.display().to_string(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("bin") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory blob store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemBlobStore {
    blobs: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, Blob>>>,
}

impl MemBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemBlobStore {
    fn put(&self, key: &str, filename: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.lock().expect("blob store lock").insert(
            key.to_string(),
            Blob {
                filename: filename.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Blob> {
        self.blobs
            .lock()
            .expect("blob store lock")
            .get(key)
            .cloned()
            .ok_or_else(|| {
                StorageError::BlobNotFound {
                    key: key.to_string(),
                }
                .into()
            })
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.blobs.lock().expect("blob store lock").remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .blobs
            .lock()
            .expect("blob store lock")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
