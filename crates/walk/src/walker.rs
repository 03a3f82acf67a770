use crate::entry::WalkEntry;
use crate::error::WalkError;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Depth-first iterator over filesystem entries.
#[derive(Debug)]
pub struct Walker {
    yielded_root: bool,
    root_entry: Option<(PathBuf, fs::Metadata)>,
    stack: Vec<DirectoryState>,
    finished: bool,
}

impl Walker {
    pub(crate) fn new(root: PathBuf, include_root: bool) -> Result<Self, WalkError> {
        tracing::debug!(target: "mdsum::walk", root = %root.display(), "starting traversal");

        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::root_metadata(root.clone(), error))?;

        let mut stack = Vec::new();
        if metadata.is_dir() {
            stack.push(DirectoryState::new(root.clone(), PathBuf::new(), 0)?);
        }

        Ok(Self {
            yielded_root: !include_root,
            root_entry: Some((root, metadata)),
            stack,
            finished: false,
        })
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| WalkError::metadata(full_path.clone(), error))?;

        // Descend into real directories only; symlinks are yielded as
        // themselves and never followed, so cycles are impossible.
        if metadata.is_dir() {
            let state = DirectoryState::new(full_path.clone(), relative_path.clone(), depth)?;
            self.stack.push(state);
        }

        Ok(WalkEntry {
            full_path,
            relative_path,
            metadata,
            depth,
            is_root: false,
        })
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.yielded_root {
            self.yielded_root = true;
            if let Some((full_path, metadata)) = self.root_entry.take() {
                return Some(Ok(WalkEntry {
                    full_path,
                    relative_path: PathBuf::new(),
                    metadata,
                    depth: 0,
                    is_root: true,
                }));
            }
        }

        loop {
            let (full_path, relative_path, depth) = {
                let state = self.stack.last_mut()?;
                if let Some(name) = state.next_name() {
                    let full_path = state.fs_path.join(&name);
                    let relative_path = if state.relative_prefix.as_os_str().is_empty() {
                        PathBuf::from(&name)
                    } else {
                        state.relative_prefix.join(&name)
                    };
                    (full_path, relative_path, state.depth + 1)
                } else {
                    self.stack.pop();
                    continue;
                }
            };

            match self.prepare_entry(full_path, relative_path, depth) {
                Ok(entry) => return Some(Ok(entry)),
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// A directory whose sorted children are being yielded.
#[derive(Debug)]
struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
    depth: usize,
}

impl DirectoryState {
    fn new(fs_path: PathBuf, relative_prefix: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| WalkError::read_dir(fs_path.clone(), error))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| WalkError::read_dir_entry(fs_path.clone(), error))?;
            entries.push(entry.file_name());
        }
        // Lexicographic order keeps the sequence independent of the
        // filesystem's native iteration order.
        entries.sort();

        tracing::trace!(
            target: "mdsum::walk",
            path = %fs_path.display(),
            count = entries.len(),
            "read directory"
        );

        Ok(Self {
            fs_path,
            relative_prefix,
            entries,
            index: 0,
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index)?.clone();
        self.index += 1;
        Some(name)
    }
}
