use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, error, info};

use crate::error_handling::types::StorageError;

/// Filesystem-backed object store for uploaded file bytes.
///
/// Objects are addressed by forward-slash paths (e.g.
/// `submissions/CHEM101/1724500000000-essay.pdf`) under a base directory.
/// Writes never overwrite: a duplicate path is a `Conflict`.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| {
            error!("Failed to create object store dir {}: {}", base_path.display(), e);
            StorageError::WriteFailed
        })?;
        info!("FileStore initialized at {}", base_path.display());
        Ok(Self { base_path })
    }

    fn resolve(&self, object_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(object_path);
        // Only plain nested names; no absolute paths, no parent escapes.
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if object_path.is_empty() || !safe {
            error!("Rejected object path {:?}", object_path);
            return Err(StorageError::WriteFailed);
        }
        Ok(self.base_path.join(relative))
    }

    /// Writes a new object. Fails with `Conflict` if the path is taken.
    pub fn put(&self, object_path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(object_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create dir {}: {}", parent.display(), e);
                StorageError::WriteFailed
            })?;
        }
        let mut f = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    StorageError::Conflict
                } else {
                    error!("Create failed {}: {}", path.display(), e);
                    StorageError::WriteFailed
                }
            })?;
        f.write_all(bytes).map_err(|e| {
            error!("Write failed {}: {}", path.display(), e);
            StorageError::WriteFailed
        })?;
        debug!("Stored {} byte(s) at {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn get(&self, object_path: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(object_path)?;
        let mut buf = Vec::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut buf))
            .map_err(|e| {
                error!("Read failed {}: {}", path.display(), e);
                StorageError::ReadFailed
            })?;
        debug!("Read {} byte(s) from {}", buf.len(), path.display());
        Ok(buf)
    }
}
