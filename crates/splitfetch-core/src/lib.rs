//! Parallel HTTP range downloading with ordered chunk reassembly.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations (partitioning, header parsing, naming)
//! - [`effects`] - I/O operations behind the [`HttpClient`] trait
//!
//! # Pipeline
//!
//! A `HEAD` probe learns the size and whether `Accept-Ranges: bytes` is
//! offered. If so, `[0, contentLength)` is split into one range per task,
//! every range is streamed into `<name>.<index>` concurrently, and the chunks
//! are concatenated in index order into `<name>`. Otherwise the resource is
//! fetched with one plain `GET`.
//!
//! Any failure is terminal; there is no retry. Chunk files are removed on
//! every failure path, including cancellation.

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{RangePartitioner, partition};
pub use data::{
    ChunkFile, ContentMetadata, DownloadMode, DownloadPhase, DownloadResult, DownloadTarget,
    FetchOptions, Progress, RangeSpec,
};
pub use effects::{
    BodyResponse, BoxStream, CapabilityProbe, ChunkGuard, DownloadOrchestrator, HttpClient,
    ProgressAggregator, RangeFetcher, Reassembler, ResponseHead, SequentialFetcher,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{Error, Result};
pub use tokio_util::sync::CancellationToken;
