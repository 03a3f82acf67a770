use crate::error::WalkError;
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a filesystem traversal rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
}

impl WalkBuilder {
    /// Creates a new builder that will traverse the provided root path.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            include_root: false,
        }
    }

    /// Controls whether the root entry itself should be emitted.
    ///
    /// Off by default; traversal then starts directly with the root's
    /// children.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Builds a [`Walker`] using the configured options.
    ///
    /// Fails if the root's metadata cannot be queried, so a missing root is
    /// reported here rather than on the first iteration.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.include_root)
    }
}
