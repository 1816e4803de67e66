//! Core memory document
//!
//! A single markdown file holding the most important facts about the user.
//! It lives next to the memory database and is loaded wholesale at the
//! start of every session.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;

/// Handle to the core memory markdown file
#[derive(Debug, Clone)]
pub struct CoreMemory {
    path: PathBuf,
}

impl CoreMemory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the core memory file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the core memory content, or an empty string if there is none
    pub fn load(&self) -> Result<String> {
        if !self.exists() {
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// Replace the core memory content
    pub fn save(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), bytes = content.len(), "Saved core memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_core_memory() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreMemory::new(dir.path().join("core_memory.md"));

        assert!(!core.exists());
        assert_eq!(core.load().unwrap(), "");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreMemory::new(dir.path().join("sub").join("core_memory.md"));

        core.save("# About\n\nLikes hiking").unwrap();
        assert!(core.exists());
        assert_eq!(core.load().unwrap(), "# About\n\nLikes hiking");

        core.save("replaced").unwrap();
        assert_eq!(core.load().unwrap(), "replaced");
    }
}
