use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Owns the chunk files of one download and removes them when dropped,
/// unless [`commit`](Self::commit) was called.
///
/// Covers every way out of the fetch and reassembly phases: errors,
/// cancellation and aborted tasks.
#[derive(Debug, Default)]
pub struct ChunkGuard {
    paths: Vec<PathBuf>,
    committed: bool,
}

impl ChunkGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path before anything is written to it.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The chunks were consumed; leave the filesystem alone.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ChunkGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.paths {
            remove_quietly(path);
        }
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed chunk file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove chunk file"),
    }
}
