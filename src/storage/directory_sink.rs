use std::fs;
use std::path::{Path, PathBuf};

use crate::controllers::ports::output_sink::OutputSink;

/// Writes each image to `<directory>/<name>`, creating the directory on first use.
#[derive(Debug)]
pub struct DirectorySink {
    directory: PathBuf,
    prepared: bool,
}

impl DirectorySink {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prepared: false,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn ensure_directory(&mut self) -> std::io::Result<()> {
        if self.prepared {
            return Ok(());
        }

        if self.directory.is_dir() {
            tracing::debug!(directory = %self.directory.display(), "output directory already exists");
        } else {
            fs::create_dir_all(&self.directory)?;
            tracing::info!(directory = %self.directory.display(), "created output directory");
        }

        self.prepared = true;
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn accept(&mut self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.ensure_directory()?;

        let path = self.directory.join(name);
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "image written");

        Ok(())
    }
}
