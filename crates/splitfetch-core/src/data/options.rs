use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::progress::Progress;

/// Callback invoked with progress snapshots.
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Configuration for one download.
///
/// # Examples
///
/// ```
/// use splitfetch_core::FetchOptions;
///
/// let options = FetchOptions::default()
///     .fan_out(8)
///     .output_dir("downloads")
///     .header("User-Agent", "splitfetch");
/// assert_eq!(options.fan_out, 8);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Number of concurrent range requests.
    ///
    /// Capped at the content length, so every range holds at least one byte.
    /// The length is cut into batches of `content_length / fan_out` bytes;
    /// a remainder adds one shorter range, and so one more task. There is no
    /// separate worker ceiling.
    ///
    /// Default: 5
    pub fan_out: u64,

    /// Directory that receives the chunk files and the final file.
    ///
    /// Default: current directory
    pub output_dir: PathBuf,

    /// Extra headers sent with the probe and with every GET.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Progress callback.
    ///
    /// Invoked on every phase transition and after every chunk write. Writes
    /// come from several tasks at once, so the callback must tolerate
    /// concurrent calls.
    ///
    /// Default: None
    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("fan_out", &self.fan_out)
            .field("output_dir", &self.output_dir)
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            fan_out: 5,
            output_dir: PathBuf::from("."),
            headers: Arc::new([]),
            on_progress: None,
        }
    }
}

impl FetchOptions {
    pub fn fan_out(mut self, fan_out: u64) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers = self.headers.to_vec();
        headers.push((key.into(), value.into()));
        self.headers = headers.into();
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.fan_out, 5);
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert!(options.headers.is_empty());
        assert!(options.on_progress.is_none());
    }

    #[test]
    fn headers_accumulate() {
        let options = FetchOptions::default()
            .header("Accept", "*/*")
            .header("User-Agent", "splitfetch");
        assert_eq!(
            &options.headers[..],
            &[
                ("Accept".to_string(), "*/*".to_string()),
                ("User-Agent".to_string(), "splitfetch".to_string()),
            ]
        );
    }

    #[test]
    fn debug_hides_callback() {
        let options = FetchOptions::default().on_progress(Arc::new(|_: &Progress| {}));
        assert!(format!("{options:?}").contains("<callback>"));
    }
}
