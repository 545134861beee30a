use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::core::{RangePartitioner, chunk_filename};
use crate::data::{
    ChunkFile, ContentMetadata, DownloadMode, DownloadPhase, DownloadResult, DownloadTarget,
    FetchOptions, Progress,
};
use crate::effects::fetcher::{RangeFetcher, SequentialFetcher};
use crate::effects::guard::ChunkGuard;
use crate::effects::http::HttpClient;
use crate::effects::probe::CapabilityProbe;
use crate::effects::progress::ProgressAggregator;
use crate::effects::reassemble::Reassembler;
use crate::error::{Error, Result};

/// Runs one download from probe to final file.
///
/// With range support: probe, partition, one task per range, wait for all,
/// reassemble. Without it: one sequential `GET`. The first failing task
/// cancels the others and its error is returned; chunk files are removed on
/// every failure path.
pub struct DownloadOrchestrator<C: HttpClient> {
    client: Arc<C>,
    options: FetchOptions,
}

impl<C: HttpClient + 'static> DownloadOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self::with_shared_client(Arc::new(client))
    }

    pub fn with_shared_client(client: Arc<C>) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub async fn download(&self, url: &str) -> Result<DownloadResult> {
        self.download_with_cancel(url, CancellationToken::new()).await
    }

    /// Like [`download`](Self::download), aborting every in-flight request
    /// once `cancel` fires.
    pub async fn download_with_cancel(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> Result<DownloadResult> {
        let started = Instant::now();
        let target = DownloadTarget::parse(url)?;

        self.report(DownloadPhase::Probing, 0, 0);
        let probe = CapabilityProbe::new(&*self.client, &self.options.headers);
        let metadata = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            metadata = probe.probe(&target) => metadata?,
        };

        let filename = metadata.resolve_filename(&target);
        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        let destination = self.options.output_dir.join(&filename);

        let (bytes, mode) = match metadata.require_ranges() {
            Ok(()) if metadata.content_length > 0 => {
                self.parallel(&target, &metadata, &filename, &destination, &cancel)
                    .await?
            }
            Ok(()) => {
                tracing::debug!("empty resource, nothing to partition");
                self.sequential(
                    &target,
                    &metadata,
                    &destination,
                    &cancel,
                    DownloadPhase::Fetching,
                )
                .await?
            }
            Err(e) if e.is_recoverable() => {
                tracing::info!("{e}, falling back to sequential download");
                self.sequential(
                    &target,
                    &metadata,
                    &destination,
                    &cancel,
                    DownloadPhase::SequentialFallback,
                )
                .await?
            }
            Err(e) => return Err(e),
        };

        self.report(DownloadPhase::Done, bytes, metadata.content_length);
        let elapsed = started.elapsed();
        tracing::info!(bytes, ?elapsed, "downloaded {}", destination.display());

        Ok(DownloadResult {
            path: destination,
            filename,
            bytes,
            elapsed,
            mode,
        })
    }

    async fn parallel(
        &self,
        target: &DownloadTarget,
        metadata: &ContentMetadata,
        filename: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<(u64, DownloadMode)> {
        let content_length = metadata.content_length;

        self.report(DownloadPhase::Partitioning, 0, content_length);
        let partitioner = RangePartitioner::new(content_length, self.options.fan_out)?;
        tracing::info!(
            fan_out = partitioner.fan_out(),
            ranges = partitioner.range_count(),
            batch_size = partitioner.batch_size(),
            "partitioned {content_length} bytes"
        );

        let progress = Arc::new(
            ProgressAggregator::new(content_length, DownloadPhase::Fetching)
                .with_callback(self.options.on_progress.clone()),
        );
        let fetcher = RangeFetcher::new(
            Arc::clone(&self.client),
            target.as_str(),
            Arc::clone(&self.options.headers),
            Arc::clone(&progress),
        );

        self.report(DownloadPhase::Fetching, 0, content_length);
        let abort = cancel.child_token();
        let mut guard = ChunkGuard::new();
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        while let Some(range) = partitioner.next_range() {
            let index = dispatched;
            let path = self.options.output_dir.join(chunk_filename(filename, index));
            guard.track(&path);

            let fetcher = fetcher.clone();
            let abort = abort.clone();
            tasks.spawn(async move {
                tokio::select! {
                    biased;
                    _ = abort.cancelled() => Err(Error::Cancelled),
                    chunk = fetcher.fetch(index, range, path) => chunk,
                }
            });
            dispatched += 1;
        }

        let chunks = join_fetches(tasks, dispatched, &abort).await?;
        debug_assert_eq!(
            chunks.iter().map(|c| c.byte_count).sum::<u64>(),
            content_length
        );

        self.report(
            DownloadPhase::Reassembling,
            progress.bytes_read(),
            content_length,
        );
        let bytes = Reassembler::reassemble(&chunks, destination).await?;
        guard.commit();

        Ok((bytes, DownloadMode::Parallel { chunks: chunks.len() }))
    }

    /// One unranged `GET`. `phase` is `SequentialFallback` only when the
    /// server refused ranges; an empty resource is fetched under `Fetching`.
    async fn sequential(
        &self,
        target: &DownloadTarget,
        metadata: &ContentMetadata,
        destination: &Path,
        cancel: &CancellationToken,
        phase: DownloadPhase,
    ) -> Result<(u64, DownloadMode)> {
        self.report(phase, 0, metadata.content_length);

        let progress = ProgressAggregator::new(metadata.content_length, phase)
            .with_callback(self.options.on_progress.clone());
        let fetcher = SequentialFetcher::new(&*self.client, &self.options.headers, &progress);

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let _ = tokio::fs::remove_file(destination).await;
                return Err(Error::Cancelled);
            }
            bytes = fetcher.fetch(target.as_str(), destination) => bytes?,
        };

        if bytes != metadata.content_length {
            tracing::warn!(
                expected = metadata.content_length,
                actual = bytes,
                "body length differs from probed Content-Length"
            );
        }
        Ok((bytes, DownloadMode::Sequential))
    }

    fn report(&self, phase: DownloadPhase, bytes_read: u64, total_bytes: u64) {
        tracing::debug!(%phase, "entering phase");
        if let Some(ref callback) = self.options.on_progress {
            callback(&Progress {
                phase,
                bytes_read,
                total_bytes,
            });
        }
    }
}

/// Wait for every fetch task. On the first failure, cancel and drain the rest
/// before returning, so no task is still writing when chunk files are removed.
async fn join_fetches(
    mut tasks: JoinSet<Result<ChunkFile>>,
    expected: usize,
    abort: &CancellationToken,
) -> Result<Vec<ChunkFile>> {
    let mut chunks = Vec::with_capacity(expected);

    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| Error::Task(e.to_string()))
            .and_then(|chunk| chunk);
        match outcome {
            Ok(chunk) => chunks.push(chunk),
            Err(e) => {
                tracing::warn!(error = %e, "range fetch failed, aborting download");
                abort.cancel();
                tasks.shutdown().await;
                return Err(e);
            }
        }
    }

    chunks.sort_by_key(|c| c.index);
    Ok(chunks)
}
