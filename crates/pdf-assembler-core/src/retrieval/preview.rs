//! Locally materialized preview artifacts.
//!
//! Each [`PreviewHandle`] owns a temporary file holding the rendered PDF so
//! a viewer can open it by path. Handles are counted by the
//! [`PreviewRegistry`] that created them; dropping a handle deletes the file
//! and decrements the count, whether it was replaced, torn down with its
//! view, or abandoned on an error path.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use tracing::debug;

/// Tracks how many preview handles are alive.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<AtomicUsize>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles not yet released.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Write `bytes` to a fresh temp file and register the handle.
    ///
    /// Blocking; call from `spawn_blocking` inside async code.
    pub fn acquire(&self, label: &str, bytes: &[u8]) -> io::Result<PreviewHandle> {
        let mut file = tempfile::Builder::new()
            .prefix("pdf-preview-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        self.live.fetch_add(1, Ordering::SeqCst);
        debug!("Acquired preview for {} at {}", label, file.path().display());

        Ok(PreviewHandle {
            file,
            len: bytes.len() as u64,
            live: Arc::clone(&self.live),
        })
    }
}

/// A preview file that is deleted when the handle is dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
    len: u64,
    live: Arc<AtomicUsize>,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the artifact to a permanent location.
    pub async fn save_to(&self, dest: impl AsRef<Path>) -> io::Result<u64> {
        tokio::fs::copy(self.file.path(), dest).await
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        debug!("Released preview at {}", self.file.path().display());
    }
}
