//! Filesystem access for the `/files/` routes.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {0}")]
    NotFound(String),
    /// The name would escape the serving root.
    #[error("rejected file name: {0:?}")]
    Rejected(String),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Files addressed by relative name under some root.
pub trait FileStore: Send + Sync {
    /// Fails with [`StoreError::Rejected`] for names that can never be served.
    fn check_name(&self, _name: &str) -> Result<(), StoreError> {
        Ok(())
    }
    fn exists(&self, name: &str) -> bool;
    fn read_all(&self, name: &str) -> Result<Vec<u8>, StoreError>;
    /// Creates or overwrites `name` with `bytes`.
    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// A [`FileStore`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request name to a path under the root, lexically.
    ///
    /// Only plain relative names are accepted: no `..`, no absolute paths and
    /// no NUL bytes. Nested names such as `a/b.txt` are allowed.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(name);
        let plain = !name.contains('\0')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && relative
                .components()
                .any(|c| matches!(c, Component::Normal(_)));

        if !plain {
            return Err(StoreError::Rejected(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Resolves `name` and follows symlinks, rejecting anything whose real
    /// location is outside the canonical root. The file itself may not exist
    /// yet, but its directory must.
    pub fn contain(&self, name: &str) -> Result<PathBuf, StoreError> {
        let path = self.resolve(name)?;
        let root = self.root.canonicalize()?;

        let (Some(parent), Some(file)) = (path.parent(), path.file_name()) else {
            return Err(StoreError::Rejected(name.to_string()));
        };
        let parent = parent.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io(e),
        })?;

        let target = parent.join(file);
        let real = match target.canonicalize() {
            Ok(real) => real,
            Err(e) if e.kind() == ErrorKind::NotFound && target.symlink_metadata().is_err() => {
                target
            }
            // dangling symlink
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Rejected(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if !real.starts_with(&root) {
            return Err(StoreError::Rejected(name.to_string()));
        }
        Ok(real)
    }
}

impl FileStore for DirStore {
    fn check_name(&self, name: &str) -> Result<(), StoreError> {
        match self.contain(name) {
            Err(StoreError::Rejected(name)) => Err(StoreError::Rejected(name)),
            _ => Ok(()),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.contain(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read_all(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.contain(name)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io(e),
        })
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.contain(name)?;
        std::fs::write(&path, bytes)?;
        Ok(())
    }
}
