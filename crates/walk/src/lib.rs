#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` provides the deterministic filesystem traversal used when building
//! directory digests. The walker enumerates entries depth-first, sorting each
//! directory's children before yielding them so the sequence is stable
//! regardless of the underlying filesystem's iteration order.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures traversal, currently only whether the root
//!   entry itself is emitted.
//! - [`Walker`] implements [`Iterator`] and yields [`WalkEntry`] values. A
//!   directory's contents are fully processed before the walker moves to the
//!   next sibling.
//! - [`WalkError`] describes traversal failures and always carries the
//!   offending path so callers can surface actionable diagnostics.
//!
//! # Invariants
//!
//! - Relative paths in emitted entries never contain `..` segments.
//! - Symbolic links are yielded as themselves (via symlink metadata) and are
//!   never followed, so traversal cannot cycle.
//! - The first error terminates traversal; the iterator yields the error and
//!   then `None`.
//!
//! # Examples
//!
//! ```
//! use std::fs;
//! use walk::WalkBuilder;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir(temp.path().join("nested"))?;
//! fs::write(temp.path().join("nested/file.txt"), b"data")?;
//!
//! let mut names = Vec::new();
//! for entry in WalkBuilder::new(temp.path()).build()? {
//!     names.push(entry?.relative_path().to_path_buf());
//! }
//! assert_eq!(names, [
//!     std::path::PathBuf::from("nested"),
//!     std::path::PathBuf::from("nested/file.txt"),
//! ]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use builder::WalkBuilder;
pub use entry::WalkEntry;
pub use error::{WalkError, WalkErrorKind};
pub use walker::Walker;

#[cfg(test)]
mod tests;
