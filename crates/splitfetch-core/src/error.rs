//! Error types for splitfetch-core.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("cannot parse {header} header: {reason}")]
    HeaderParse {
        header: &'static str,
        reason: String,
    },

    #[error("parallel download not supported")]
    UnsupportedRange,

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("chunk {index} has {actual} bytes, expected {expected}")]
    ChunkLength {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("chunk {found} out of order, expected {expected}")]
    InvalidChunkOrder { expected: usize, found: usize },

    #[error("download cancelled")]
    Cancelled,

    #[error("fetch task failed: {0}")]
    Task(String),
}

impl Error {
    /// Only a missing range capability is handled locally, by switching to a
    /// sequential download. Everything else is terminal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnsupportedRange)
    }

    pub(crate) fn transport<E: std::error::Error>(e: E) -> Self {
        Error::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
