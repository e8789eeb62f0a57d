use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fgd_common::{FgdError, Result};

/// Destination of generated files.
pub trait FgdWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes files to disk, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl FgdWriter for FsWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FgdError::io(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| FgdError::io(path, e))
    }
}

/// Keeps generated files in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryWriter {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }
}

impl FgdWriter for MemoryWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
