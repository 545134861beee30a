use std::fmt;

/// States of one download.
///
/// The parallel path runs Probing → Partitioning → Fetching → Reassembling →
/// Done. When the server does not accept ranges, Probing is followed by
/// SequentialFallback and then Done. An empty resource on a range-capable
/// server skips partitioning: Probing, Fetching, Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    /// HEAD request in flight.
    #[default]
    Probing,

    /// Splitting `[0, contentLength)` into ranges.
    Partitioning,

    /// Range requests streaming into chunk files.
    Fetching,

    /// Concatenating chunk files into the final file.
    Reassembling,

    /// One unranged GET streaming straight into the final file.
    SequentialFallback,

    /// The final file is in place.
    Done,
}

impl fmt::Display for DownloadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadPhase::Probing => write!(f, "Probing"),
            DownloadPhase::Partitioning => write!(f, "Partitioning"),
            DownloadPhase::Fetching => write!(f, "Fetching"),
            DownloadPhase::Reassembling => write!(f, "Reassembling"),
            DownloadPhase::SequentialFallback => write!(f, "SequentialFallback"),
            DownloadPhase::Done => write!(f, "Done"),
        }
    }
}

/// Snapshot handed to progress callbacks.
///
/// Used for rendering only. Nothing in the download path reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: DownloadPhase,

    /// Bytes written so far across every concurrent writer.
    pub bytes_read: u64,

    /// Total size from the probe's `Content-Length`.
    pub total_bytes: u64,
}

impl Progress {
    /// Percentage complete, rounded up.
    ///
    /// An empty resource reports 100 once done and 0 before.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if self.total_bytes == 0 {
            return if self.is_done() { 100 } else { 0 };
        }
        let read = self.bytes_read.min(self.total_bytes) as u128 * 100;
        read.div_ceil(self.total_bytes as u128) as u8
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == DownloadPhase::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(bytes_read: u64, total_bytes: u64) -> Progress {
        Progress {
            phase: DownloadPhase::Fetching,
            bytes_read,
            total_bytes,
        }
    }

    #[test]
    fn percentage_rounds_up() {
        assert_eq!(at(0, 3).percentage(), 0);
        assert_eq!(at(1, 3).percentage(), 34);
        assert_eq!(at(3, 3).percentage(), 100);
    }

    #[test]
    fn percentage_of_empty_resource() {
        let mut p = at(0, 0);
        assert_eq!(p.percentage(), 0);
        p.phase = DownloadPhase::Done;
        assert_eq!(p.percentage(), 100);
    }

    #[test]
    fn percentage_is_capped() {
        assert_eq!(at(20, 10).percentage(), 100);
    }
}
