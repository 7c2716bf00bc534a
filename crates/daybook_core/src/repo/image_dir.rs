//! Content directory holding event image bytes.
//!
//! # Responsibility
//! - Write and remove one file per stored image name.
//! - Resolve stored names to paths for the presentation layer.
//!
//! # Invariants
//! - Files are only ever addressed by a bare stored name inside `root`.
//! - Removing a file that is already gone is not an error.

use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// I/O failure on one image file.
#[derive(Debug)]
pub enum ImageDirError {
    /// Stored name is not a bare filename.
    InvalidName(String),
    Io { path: PathBuf, source: io::Error },
}

impl Display for ImageDirError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid stored image name `{name}`"),
            Self::Io { path, source } => write!(f, "image file `{}`: {source}", path.display()),
        }
    }
}

impl Error for ImageDirError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Result of removing one stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    AlreadyAbsent,
}

/// Directory that owns stored image files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDir {
    root: PathBuf,
}

impl ImageDir {
    /// Uses `root` as the content directory, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ImageDirError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| ImageDirError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `stored_name` inside the content directory.
    pub fn path_of(&self, stored_name: &str) -> Result<PathBuf, ImageDirError> {
        let is_bare = Path::new(stored_name)
            .file_name()
            .is_some_and(|name| name == stored_name);
        if stored_name.is_empty() || !is_bare {
            return Err(ImageDirError::InvalidName(stored_name.to_string()));
        }
        Ok(self.root.join(stored_name))
    }

    /// Writes `bytes` under `stored_name`, replacing any previous content.
    pub fn write(&self, stored_name: &str, bytes: &[u8]) -> Result<PathBuf, ImageDirError> {
        let path = self.path_of(stored_name)?;
        std::fs::write(&path, bytes).map_err(|source| ImageDirError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Removes `stored_name`; a missing file yields `AlreadyAbsent`.
    pub fn remove(&self, stored_name: &str) -> Result<RemoveOutcome, ImageDirError> {
        let path = self.path_of(stored_name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::AlreadyAbsent),
            Err(source) => {
                warn!(
                    "event=image_remove module=image_dir status=error error_code=io_failed error={}",
                    source
                );
                Err(ImageDirError::Io { path, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageDir, ImageDirError, RemoveOutcome};

    #[test]
    fn write_then_remove_twice_reports_absent() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageDir::open(dir.path().join("images")).unwrap();

        let path = images.write("1_a.png", b"png").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"png");

        assert_eq!(images.remove("1_a.png").unwrap(), RemoveOutcome::Removed);
        assert_eq!(
            images.remove("1_a.png").unwrap(),
            RemoveOutcome::AlreadyAbsent
        );
    }

    #[test]
    fn path_of_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageDir::open(dir.path()).unwrap();
        for name in ["", "../x.png", "a/b.png", ".."] {
            assert!(matches!(
                images.path_of(name),
                Err(ImageDirError::InvalidName(_))
            ));
        }
    }
}
