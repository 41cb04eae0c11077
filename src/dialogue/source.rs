//! Where dialogue documents come from.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::script::DialogueError;

/// Supplies raw dialogue documents by key.
pub trait DialogueSource {
    /// Returns the JSON text stored under `key`.
    ///
    /// # Errors
    /// [`DialogueError::Io`] when the document cannot be read.
    fn load(&self, key: &str) -> Result<String, DialogueError>;
}

/// Reads `<root>/<key>.json` from disk.
#[derive(Debug, Clone)]
pub struct FsDialogueSource {
    root: PathBuf,
}

impl FsDialogueSource {
    /// A source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory documents are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a key resolves to.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl DialogueSource for FsDialogueSource {
    fn load(&self, key: &str) -> Result<String, DialogueError> {
        let path = self.path_for(key);
        debug!("loading dialogue document {}", path.display());
        fs::read_to_string(&path).map_err(|source| {
            warn!("dialogue document not found at {}: {source}", path.display());
            DialogueError::Io {
                key: key.to_owned(),
                source,
            }
        })
    }
}
