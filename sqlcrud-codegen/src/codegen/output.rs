//! Output sinks for generated files

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

/// Destination for generated text
pub trait OutputSink {
    /// Persist `content` at `path`, replacing any existing file
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Paths written so far, in write order
    fn written(&self) -> &[PathBuf];
}

/// Writes files to disk, creating parent directories as needed
#[derive(Debug, Default)]
pub struct FileSink {
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        debug!("Wrote {}", path.display());
        self.written.push(path.to_path_buf());
        Ok(())
    }

    fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Records what would be written without touching the filesystem
#[derive(Debug, Default)]
pub struct DryRunSink {
    written: Vec<PathBuf>,
    bytes: usize,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total size of everything that would have been written
    pub fn total_bytes(&self) -> usize {
        self.bytes
    }
}

impl OutputSink for DryRunSink {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        info!("Would write {} ({} bytes)", path.display(), content.len());
        self.bytes += content.len();
        self.written.push(path.to_path_buf());
        Ok(())
    }

    fn written(&self) -> &[PathBuf] {
        &self.written
    }
}
