#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `treehash` computes one aggregate MD5 digest for a whole directory tree.
//! Every regular file beneath the root is hashed, the per-file hex digests
//! are concatenated in sorted relative-path order with no separators, and
//! that concatenation (as UTF-8) is hashed once more.
//!
//! # Invariants
//!
//! - The aggregate is independent of filesystem enumeration order: paths are
//!   sorted by their byte representation before concatenation.
//! - Adding, removing, renaming, or modifying any single file changes the
//!   aggregate with overwhelming probability.
//! - Any walker or per-file I/O failure aborts the whole computation; a
//!   partial aggregate is never returned, since determinism requires a
//!   complete, consistent enumeration.
//!
//! The concatenation is deliberately not self-describing: file count and
//! per-file boundaries are not encoded. Two different file sets whose
//! sorted concatenated digests coincide would collide; this is an accepted
//! tradeoff of the simple scheme, not a guarantee worth defending.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use md5_core::{Digest, Md5};
use walk::WalkBuilder;

/// Default file name for a manifest persisted inside the hashed tree.
pub const DEFAULT_MANIFEST_NAME: &str = "file_hashes.txt";

/// Header line written at the top of persisted manifests.
pub const MANIFEST_HEADER: &str = "File\tMD5 Hash";

/// Errors produced while hashing a directory tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The root path could not be inspected.
    #[error("failed to inspect '{path}': {source}")]
    Root {
        /// Path that failed to provide metadata.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The root path exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },
    /// Directory traversal failed.
    #[error(transparent)]
    Walk(#[from] walk::WalkError),
    /// A file could not be read while hashing.
    #[error("failed to hash '{path}': {source}")]
    HashFile {
        /// File that could not be hashed.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The per-file manifest could not be written.
    #[error(transparent)]
    Manifest(#[from] manifest::ManifestError),
}

/// Digest of one file within a hashed tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDigest {
    /// Path relative to the tree root.
    pub relative_path: PathBuf,
    /// The file's MD5 digest.
    pub digest: Digest,
}

/// Hashes every regular file under `root`, sorted by relative path bytes.
///
/// Files are processed strictly sequentially. Symbolic links and other
/// non-regular entries are skipped.
pub fn file_digests<P: AsRef<Path>>(root: P) -> Result<Vec<FileDigest>, TreeError> {
    let root = root.as_ref();
    let metadata = fs::symlink_metadata(root).map_err(|source| TreeError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(TreeError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkBuilder::new(root).build()? {
        let entry = entry?;
        if entry.is_file() {
            files.push((
                entry.relative_path().to_path_buf(),
                entry.full_path().to_path_buf(),
            ));
        }
    }

    // The walker is already deterministic, but its depth-first sequence is
    // not the byte order of full relative paths ("a.x" sorts before "a/y").
    files.sort_by(|(left, _), (right, _)| {
        left.as_os_str()
            .as_encoded_bytes()
            .cmp(right.as_os_str().as_encoded_bytes())
    });

    tracing::debug!(
        target: "mdsum::tree",
        root = %root.display(),
        count = files.len(),
        "hashing files"
    );

    let mut digests = Vec::with_capacity(files.len());
    for (relative_path, full_path) in files {
        let digest = md5_core::hash_file(&full_path).map_err(|source| TreeError::HashFile {
            path: full_path.clone(),
            source,
        })?;
        tracing::trace!(
            target: "mdsum::tree",
            file = %relative_path.display(),
            digest = %digest,
            "hashed file"
        );
        digests.push(FileDigest {
            relative_path,
            digest,
        });
    }
    Ok(digests)
}

/// Computes the aggregate digest of the directory tree rooted at `root`.
///
/// Fails with [`TreeError::NotADirectory`] when `root` is not a directory
/// and aborts on the first traversal or file I/O failure.
pub fn hash_directory<P: AsRef<Path>>(root: P) -> Result<Digest, TreeError> {
    let digests = file_digests(root)?;
    Ok(aggregate(&digests))
}

/// Folds already-computed per-file digests into the aggregate digest.
///
/// `digests` must be in sorted relative-path order, as returned by
/// [`file_digests`].
#[must_use]
pub fn aggregate(digests: &[FileDigest]) -> Digest {
    let mut hasher = Md5::new();
    for file in digests {
        hasher.update(file.digest.to_hex().as_bytes());
    }
    hasher.finalize()
}

/// Persists per-file digests as a manifest at `manifest_path`.
///
/// File names are recorded with `/` separators so manifests compare equal
/// across platforms. Persistence is a side effect layered on top of the
/// digest computation; it never influences the aggregate itself.
pub fn write_manifest<P: AsRef<Path>>(
    digests: &[FileDigest],
    manifest_path: P,
) -> Result<(), TreeError> {
    let mut manifest = manifest::Manifest::new();
    for file in digests {
        let name = portable_name(&file.relative_path);
        manifest.insert(name, file.digest.to_hex());
    }
    manifest.save(manifest_path, MANIFEST_HEADER)?;
    Ok(())
}

fn portable_name(path: &Path) -> String {
    let name = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        name.into_owned()
    } else {
        name.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
