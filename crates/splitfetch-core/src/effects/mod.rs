//! I/O: HTTP requests, chunk files, reassembly and the orchestration that
//! ties them together.

mod fetcher;
mod guard;
mod http;
mod orchestrator;
mod probe;
mod progress;
mod reassemble;

pub use fetcher::{RangeFetcher, SequentialFetcher};
pub use guard::ChunkGuard;
pub use http::{BodyResponse, BoxStream, HttpClient, ResponseHead};
pub use orchestrator::DownloadOrchestrator;
pub use probe::CapabilityProbe;
pub use progress::ProgressAggregator;
pub use reassemble::Reassembler;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
