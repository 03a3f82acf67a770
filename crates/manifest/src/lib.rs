#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `manifest` reads, writes, and compares hash manifests: plain-text listings
//! of `name: hex-digest` pairs used to detect added, changed, and removed
//! files between two points in time. The crate never computes digests; it
//! only consumes hex strings produced elsewhere.
//!
//! # Format
//!
//! The first line of a manifest is a header and is ignored on parse. Each
//! subsequent line is `<name>: <32-hex-char-digest>`, with surrounding
//! whitespace trimmed. Lines without the `": "` separator are skipped; a line whose digest is not exactly 32 hex
//! characters is a validation error surfaced to the caller.
//!
//! # Encoding
//!
//! Manifests written by other tools may not be UTF-8. Loading attempts UTF-8
//! first and falls back to windows-1251 and windows-1252. The fallback is
//! best-effort: legacy single-byte code pages accept almost any byte
//! sequence, so a mis-encoded file may decode to mojibake rather than fail.
//!
//! # Comparison rule
//!
//! Digest strings are compared by case-sensitive byte equality. Digests
//! rendered by this workspace are always lowercase, so self-produced
//! manifests always compare cleanly; an uppercase digest from a foreign tool
//! is deliberately treated as different. [`integrity_check`] applies the same
//! rule to a single pair.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Errors produced while loading or saving a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read or written.
    #[error("failed to access manifest '{path}': {source}")]
    Io {
        /// Manifest path involved in the failed operation.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The manifest bytes could not be decoded under any attempted encoding.
    #[error("manifest '{path}' is not valid UTF-8, windows-1251, or windows-1252 text")]
    Encoding {
        /// Manifest path that failed to decode.
        path: PathBuf,
    },
    /// A parsed digest string is not a 32-character hexadecimal value.
    #[error("manifest '{path}' line {line}: '{value}' is not a 32-character hex digest")]
    InvalidDigest {
        /// Manifest path containing the bad entry.
        path: PathBuf,
        /// One-based line number of the bad entry.
        line: usize,
        /// The offending digest string.
        value: String,
    },
}

/// Encodings attempted when decoding manifest bytes, in order.
const ENCODINGS: [&encoding_rs::Encoding; 3] = [
    encoding_rs::UTF_8,
    encoding_rs::WINDOWS_1251,
    encoding_rs::WINDOWS_1252,
];

/// A parsed manifest: file names mapped to their hex digest strings.
///
/// Names are unique within a manifest; when a file repeats, the last
/// occurrence wins. Iteration order is name-sorted, which keeps comparison
/// output deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and parses the manifest at `path`.
    ///
    /// The first line is skipped as a header. Malformed lines (no `": "`
    /// separator) are skipped; digests failing the 32-hex-character shape
    /// check abort the load with [`ManifestError::InvalidDigest`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = decode(&bytes).ok_or_else(|| ManifestError::Encoding {
            path: path.to_path_buf(),
        })?;

        let mut manifest = Self::new();
        for (index, line) in text.lines().enumerate().skip(1) {
            // Whole-line trim: stray indentation or trailing whitespace around
            // an entry is tolerated, as in manifests edited by hand.
            let line = line.trim();
            let Some((name, value)) = line.split_once(": ") else {
                if !line.is_empty() {
                    tracing::debug!(
                        target: "mdsum::manifest",
                        line = index + 1,
                        "skipping malformed manifest line"
                    );
                }
                continue;
            };
            if !is_hex_digest(value) {
                return Err(ManifestError::InvalidDigest {
                    path: path.to_path_buf(),
                    line: index + 1,
                    value: value.to_string(),
                });
            }
            manifest.insert(name.to_string(), value.to_string());
        }
        Ok(manifest)
    }

    /// Writes the manifest to `path` with the given header line.
    pub fn save<P: AsRef<Path>>(&self, path: P, header: &str) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let io_error = |source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = fs::File::create(path).map_err(io_error)?;
        writeln!(file, "{header}").map_err(io_error)?;
        for (name, digest) in &self.entries {
            writeln!(file, "{name}: {digest}").map_err(io_error)?;
        }
        Ok(())
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, name: String, hex_digest: String) {
        self.entries.insert(name, hex_digest);
    }

    /// Looks up the digest recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Iterates entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, digest)| (name.as_str(), digest.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Three-way classification of a reference manifest against a current one.
///
/// The comparison is reference-driven: names present only in the current
/// manifest are not reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Names whose digests are byte-identical in both manifests.
    pub matched: Vec<String>,
    /// Names present in both manifests with differing digests.
    pub mismatched: Vec<String>,
    /// Names present in the reference manifest but absent from the current.
    pub missing: Vec<String>,
}

impl Comparison {
    /// Whether every reference entry matched.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}

/// Classifies each reference entry as matched, mismatched, or missing.
///
/// Names are compared exactly as stored, with no path-separator or case
/// normalization. Output lists are name-sorted.
#[must_use]
pub fn compare(reference: &Manifest, current: &Manifest) -> Comparison {
    let mut result = Comparison::default();
    for (name, reference_digest) in reference.entries() {
        match current.get(name) {
            None => result.missing.push(name.to_string()),
            Some(current_digest) if integrity_check(reference_digest, current_digest) => {
                result.matched.push(name.to_string());
            }
            Some(_) => result.mismatched.push(name.to_string()),
        }
    }
    result
}

/// Plain digest equality: true only for byte-identical hex strings.
#[must_use]
pub fn integrity_check(reference: &str, current: &str) -> bool {
    reference == current
}

fn is_hex_digest(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn decode(bytes: &[u8]) -> Option<String> {
    for encoding in ENCODINGS {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return Some(text.into_owned());
        }
    }
    None
}
