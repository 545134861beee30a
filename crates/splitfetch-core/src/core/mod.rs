//! Pure transformations: range partitioning, response header parsing and
//! filename resolution. Nothing here touches the network or the disk.

pub mod filename;
pub mod headers;
mod partition;

pub use filename::chunk_filename;
pub use partition::{RangePartitioner, partition};
