//! Artifact storage.
//!
//! Exports are persisted through [`ArtifactStore`]; [`LocalStore`] keeps them
//! under a root directory on disk.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;

/// Stores rendered artifacts and hands back an opaque locator.
pub trait ArtifactStore: Send + Sync {
    fn store(&self, bytes: &[u8], name: &str) -> Result<String, StorageError>;
    fn retrieve(&self, locator: &str) -> Result<Vec<u8>, StorageError>;
    fn delete(&self, locator: &str) -> Result<(), StorageError>;
}

/// Reduce a user-supplied name to a safe single path component.
///
/// Keeps ASCII letters, digits, `-`, `_` and `.`; spaces become `_`; leading
/// dots are stripped so the result is never hidden or a parent reference.
pub fn secure_filename(name: &str) -> Result<String, StorageError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
            reason: "no usable characters".to_string(),
        });
    }
    Ok(cleaned)
}

/// Artifact store backed by a local directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a stored artifact.
    pub fn path_of(&self, locator: &str) -> Result<PathBuf, StorageError> {
        let name = secure_filename(locator)?;
        if name != locator {
            return Err(StorageError::InvalidName {
                name: locator.to_string(),
                reason: "not a locator issued by this store".to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ArtifactStore for LocalStore {
    fn store(&self, bytes: &[u8], name: &str) -> Result<String, StorageError> {
        let safe = secure_filename(name)?;
        let prefix = Uuid::new_v4().simple().to_string();
        let locator = format!("{}_{}", &prefix[..8], safe);

        std::fs::create_dir_all(&self.root).map_err(|e| Self::io_error(&self.root, e))?;
        let path = self.root.join(&locator);

        // Write to a temp file then rename, so readers never see a partial artifact.
        let tmp_path = self.root.join(format!(".{}.tmp", locator));
        std::fs::write(&tmp_path, bytes).map_err(|e| Self::io_error(&tmp_path, e))?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(Self::io_error(&path, e));
        }

        debug!(locator = %locator, bytes = bytes.len(), "Stored artifact");
        Ok(locator)
    }

    fn retrieve(&self, locator: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(locator)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                locator: locator.to_string(),
            }),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let path = self.path_of(locator)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                locator: locator.to_string(),
            }),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }
}
