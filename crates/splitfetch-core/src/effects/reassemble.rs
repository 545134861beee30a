use std::path::Path;

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::data::ChunkFile;
use crate::error::{Error, Result};

/// Concatenates chunk files, in index order, into the final file.
///
/// Chunk 0 is the base: every later chunk is appended to it and deleted right
/// after, then the base is renamed to the destination. Index order is byte
/// order, so the chunks must be exactly `0..n` in sequence.
pub struct Reassembler;

impl Reassembler {
    /// Returns the size of the assembled file.
    pub async fn reassemble(chunks: &[ChunkFile], destination: &Path) -> Result<u64> {
        let Some((base, rest)) = chunks.split_first() else {
            return Err(Error::InvalidPartition("no chunks to reassemble".into()));
        };
        for (expected, chunk) in chunks.iter().enumerate() {
            if chunk.index != expected {
                return Err(Error::InvalidChunkOrder {
                    expected,
                    found: chunk.index,
                });
            }
        }

        let mut target = OpenOptions::new().append(true).open(&base.path).await?;
        let mut total = base.byte_count;

        for chunk in rest {
            let mut source = File::open(&chunk.path).await?;
            let copied = tokio::io::copy(&mut source, &mut target).await?;
            if copied != chunk.byte_count {
                return Err(Error::ChunkLength {
                    index: chunk.index,
                    expected: chunk.byte_count,
                    actual: copied,
                });
            }
            drop(source);
            fs::remove_file(&chunk.path).await?;
            total += copied;
        }

        target.flush().await?;
        target.sync_all().await?;
        drop(target);

        fs::rename(&base.path, destination).await?;
        tracing::debug!(chunks = chunks.len(), total, "reassembled {}", destination.display());
        Ok(total)
    }
}
