/// Destination for finished images. The rendering core never touches the filesystem itself.
pub trait OutputSink {
    /// Stores `bytes` under `name`. Errors are returned to the caller, never retried.
    fn accept(&mut self, name: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Keeps every accepted image in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> &[(String, Vec<u8>)] {
        &self.frames
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.frames.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[must_use]
    pub fn into_frames(self) -> Vec<(String, Vec<u8>)> {
        self.frames
    }
}

impl OutputSink for MemorySink {
    fn accept(&mut self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.frames.push((name.to_owned(), bytes.to_vec()));
        Ok(())
    }
}
