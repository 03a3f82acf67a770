use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error returned when traversal fails.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::RootMetadata { path, source },
        }
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::ReadDir { path, source },
        }
    }

    pub(crate) fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::ReadDirEntry { path, source },
        }
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::Metadata { path, source },
        }
    }

    /// Returns the specific failure that terminated traversal.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match &self.kind {
            WalkErrorKind::RootMetadata { path, .. }
            | WalkErrorKind::ReadDir { path, .. }
            | WalkErrorKind::ReadDirEntry { path, .. }
            | WalkErrorKind::Metadata { path, .. } => path,
        }
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkErrorKind::RootMetadata { path, source } => {
                write!(f, "failed to inspect walk root '{}': {}", path.display(), source)
            }
            WalkErrorKind::ReadDir { path, source } => {
                write!(f, "failed to read directory '{}': {}", path.display(), source)
            }
            WalkErrorKind::ReadDirEntry { path, source } => {
                write!(f, "failed to read entry in '{}': {}", path.display(), source)
            }
            WalkErrorKind::Metadata { path, source } => {
                write!(f, "failed to inspect metadata for '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WalkErrorKind::RootMetadata { source, .. }
            | WalkErrorKind::ReadDir { source, .. }
            | WalkErrorKind::ReadDirEntry { source, .. }
            | WalkErrorKind::Metadata { source, .. } => Some(source),
        }
    }
}

/// Classification of traversal failures.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// Failed to query metadata for the traversal root.
    RootMetadata {
        /// Path that failed to provide metadata.
        path: PathBuf,
        /// Underlying operating system error.
        source: io::Error,
    },
    /// Failed to read the contents of a directory.
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying operating system error.
        source: io::Error,
    },
    /// Failed to obtain a directory entry during iteration.
    ReadDirEntry {
        /// Directory containing the problematic entry.
        path: PathBuf,
        /// Underlying operating system error.
        source: io::Error,
    },
    /// Failed to retrieve metadata for an entry.
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying operating system error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error(message: &'static str) -> io::Error {
        io::Error::other(message)
    }

    #[test]
    fn error_path_matches_variant_path() {
        let root = WalkError::root_metadata(PathBuf::from("root"), io_error("boom"));
        assert_eq!(Path::new("root"), root.path());

        let read_dir = WalkError::read_dir(PathBuf::from("dir"), io_error("boom"));
        assert_eq!(Path::new("dir"), read_dir.path());

        let metadata = WalkError::metadata(PathBuf::from("meta"), io_error("boom"));
        assert_eq!(Path::new("meta"), metadata.path());
    }

    #[test]
    fn display_names_the_failed_operation() {
        let error = WalkError::read_dir(PathBuf::from("dir"), io_error("boom"));
        assert_eq!("failed to read directory 'dir': boom", error.to_string());

        let error = WalkError::read_dir_entry(PathBuf::from("dir"), io_error("boom"));
        assert_eq!("failed to read entry in 'dir': boom", error.to_string());
    }

    #[test]
    fn source_exposes_the_underlying_io_error() {
        let error = WalkError::metadata(PathBuf::from("meta"), io_error("inner"));
        let source = error
            .source()
            .and_then(|err| err.downcast_ref::<io::Error>())
            .expect("io::Error source");
        assert_eq!(source.to_string(), "inner");
    }
}
