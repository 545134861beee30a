use std::fmt;
use std::path::PathBuf;

/// An inclusive byte interval `start..=stop` of the remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeSpec {
    pub start: u64,
    pub stop: u64,
}

impl RangeSpec {
    pub fn new(start: u64, stop: u64) -> Self {
        debug_assert!(start <= stop, "range start {start} past stop {stop}");
        Self { start, stop }
    }

    /// Number of bytes covered, both bounds included.
    pub fn len(&self) -> u64 {
        self.stop - self.start + 1
    }

    /// A range always covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the `Range` request header.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.stop)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

/// A finished chunk on disk.
///
/// `index` is the dispatch order of the range it holds, which is also its
/// byte-offset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub index: usize,
    pub path: PathBuf,
    pub byte_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_is_inclusive() {
        assert_eq!(RangeSpec::new(0, 0).len(), 1);
        assert_eq!(RangeSpec::new(3, 5).len(), 3);
    }

    #[test]
    fn header_value_uses_inclusive_bounds() {
        assert_eq!(RangeSpec::new(6, 10).header_value(), "bytes=6-10");
    }
}
