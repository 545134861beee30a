use std::sync::{Mutex, PoisonError};

use crate::data::RangeSpec;
use crate::error::{Error, Result};

/// Lazily emits contiguous, non-overlapping ranges covering
/// `[0, content_length)`.
///
/// The batch size is `content_length / min(requested, content_length)`, so it
/// never drops to zero. The cursor advances by one batch per call and the
/// range that reaches the end is clamped to `content_length - 1`. When the
/// length is not a multiple of the batch size, the leftover bytes become one
/// extra, shorter range: `(11, 3)` yields sizes 3, 3, 3, 2. After the last
/// range every call returns `None`.
///
/// The cursor sits behind a mutex, so a shared partitioner may be drained
/// from several tasks. Ranges are then still handed out in increasing
/// offset order, one per call.
#[derive(Debug)]
pub struct RangePartitioner {
    content_length: u64,
    fan_out: u64,
    batch_size: u64,
    cursor: Mutex<u64>,
}

impl RangePartitioner {
    /// Fails when either input is zero: an empty resource has no byte ranges
    /// and a fan-out of zero would never cover it.
    pub fn new(content_length: u64, requested_fan_out: u64) -> Result<Self> {
        if content_length == 0 {
            return Err(Error::InvalidPartition(
                "content length must be greater than 0".into(),
            ));
        }
        if requested_fan_out == 0 {
            return Err(Error::InvalidPartition(
                "fan-out must be greater than 0".into(),
            ));
        }

        let fan_out = requested_fan_out.min(content_length);
        Ok(Self {
            content_length,
            fan_out,
            batch_size: content_length / fan_out,
            cursor: Mutex::new(0),
        })
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Requested fan-out after capping at the content length.
    pub fn fan_out(&self) -> u64 {
        self.fan_out
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Number of ranges this partitioner emits in total: the fan-out, plus one
    /// when the length leaves a remainder.
    pub fn range_count(&self) -> u64 {
        self.content_length.div_ceil(self.batch_size)
    }

    /// Next range, or `None` once the resource is covered.
    pub fn next_range(&self) -> Option<RangeSpec> {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);

        let start = *cursor;
        if start >= self.content_length {
            return None;
        }

        let stop = start + (self.batch_size - 1).min(self.content_length - 1 - start);
        *cursor = stop + 1;

        Some(RangeSpec::new(start, stop))
    }
}

impl Iterator for &RangePartitioner {
    type Item = RangeSpec;

    fn next(&mut self) -> Option<RangeSpec> {
        self.next_range()
    }
}

/// Collect the full partition of `[0, content_length)`.
pub fn partition(content_length: u64, fan_out: u64) -> Result<Vec<RangeSpec>> {
    let partitioner = RangePartitioner::new(content_length, fan_out)?;
    Ok((&partitioner).collect())
}
