use std::path::PathBuf;
use std::time::Duration;

/// Which transfer path produced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Parallel { chunks: usize },
    Sequential,
}

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Full path of the final file.
    pub path: PathBuf,
    /// Resolved filename, without the output directory.
    pub filename: String,
    pub bytes: u64,
    pub elapsed: Duration,
    pub mode: DownloadMode,
}
