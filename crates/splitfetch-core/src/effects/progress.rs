use std::sync::atomic::{AtomicU64, Ordering};

use crate::data::options::ProgressCallback;
use crate::data::{DownloadPhase, Progress};

/// Byte counter shared by every writer of one download.
///
/// Increments are atomic, so the returned totals never go backwards and the
/// final count equals the sum of all bytes reported.
pub struct ProgressAggregator {
    bytes_read: AtomicU64,
    total_bytes: u64,
    phase: DownloadPhase,
    on_progress: Option<ProgressCallback>,
}

impl ProgressAggregator {
    pub fn new(total_bytes: u64, phase: DownloadPhase) -> Self {
        Self {
            bytes_read: AtomicU64::new(0),
            total_bytes,
            phase,
            on_progress: None,
        }
    }

    pub fn with_callback(mut self, on_progress: Option<ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    /// Record `bytes` more and return the updated totals.
    pub fn add(&self, bytes: u64) -> Progress {
        let bytes_read = self.bytes_read.fetch_add(bytes, Ordering::AcqRel) + bytes;
        let progress = Progress {
            phase: self.phase,
            bytes_read,
            total_bytes: self.total_bytes,
        };
        if let Some(ref callback) = self.on_progress {
            callback(&progress);
        }
        progress
    }

    pub fn snapshot(&self) -> Progress {
        Progress {
            phase: self.phase,
            bytes_read: self.bytes_read(),
            total_bytes: self.total_bytes,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Acquire)
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn add_returns_running_total() {
        let agg = ProgressAggregator::new(10, DownloadPhase::Fetching);
        assert_eq!(agg.add(3).bytes_read, 3);
        let p = agg.add(7);
        assert_eq!(p.bytes_read, 10);
        assert_eq!(p.total_bytes, 10);
        assert_eq!(p.percentage(), 100);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let agg = Arc::new(ProgressAggregator::new(8 * 1000 * 3, DownloadPhase::Fetching));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let agg = Arc::clone(&agg);
                std::thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..1000 {
                        let seen = agg.add(3).bytes_read;
                        assert!(seen > last);
                        last = seen;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(agg.bytes_read(), 24_000);
        assert_eq!(agg.snapshot().percentage(), 100);
    }

    #[test]
    fn callback_sees_every_update() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let agg = ProgressAggregator::new(4, DownloadPhase::SequentialFallback).with_callback(Some(
            Arc::new(move |p: &Progress| sink.lock().unwrap().push(p.bytes_read)),
        ));

        agg.add(1);
        agg.add(3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 4]);
        assert_eq!(agg.snapshot().phase, DownloadPhase::SequentialFallback);
    }
}
