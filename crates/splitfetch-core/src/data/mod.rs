//! Immutable data types shared by the partitioning, fetching and
//! reassembly stages.
//!
//! Nothing in this module performs I/O. Values are created once per download
//! and handed between stages by value or shared reference.

pub mod options;
pub mod progress;
pub mod range;
pub mod result;
pub mod target;

pub use options::FetchOptions;
pub use progress::{DownloadPhase, Progress};
pub use range::{ChunkFile, RangeSpec};
pub use result::{DownloadMode, DownloadResult};
pub use target::{ContentMetadata, DownloadTarget};
