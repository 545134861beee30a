//! Output and chunk file naming.

use percent_encoding::percent_decode_str;
use url::Url;

/// Used when neither the server nor the URL path provides a name.
pub const DEFAULT_FILENAME: &str = "index.html";

/// Last non-empty path segment of `url`, percent-decoded, or
/// [`DEFAULT_FILENAME`].
pub fn from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .and_then(|name| sanitize(&name))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Reduce `name` to a bare file name.
///
/// Anything up to the last path separator is dropped. Empty names and the
/// `.`/`..` entries are rejected.
pub fn sanitize(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => None,
        _ if base.contains('\0') => None,
        _ => Some(base.to_string()),
    }
}

/// `<filename>.<index>`
pub fn chunk_filename(filename: &str, index: usize) -> String {
    format!("{filename}.{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(url: &str) -> String {
        from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn takes_last_segment() {
        assert_eq!(name("https://example.com/a/b/file.iso"), "file.iso");
        assert_eq!(name("https://example.com/a/b/file.iso?x=1#frag"), "file.iso");
    }

    #[test]
    fn skips_trailing_slash() {
        assert_eq!(name("https://example.com/releases/"), "releases");
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(name("https://example.com/my%20file.txt"), "my file.txt");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(name("https://example.com"), DEFAULT_FILENAME);
        assert_eq!(name("https://example.com/"), DEFAULT_FILENAME);
        assert_eq!(name("https://example.com/.."), DEFAULT_FILENAME);
    }

    #[test]
    fn sanitize_keeps_base_name() {
        assert_eq!(sanitize("dir/sub/file").as_deref(), Some("file"));
        assert_eq!(sanitize(r"C:\temp\file.exe").as_deref(), Some("file.exe"));
        assert_eq!(sanitize("  "), None);
        assert_eq!(sanitize("dir/"), None);
    }

    #[test]
    fn chunk_names() {
        assert_eq!(chunk_filename("video.mp4", 0), "video.mp4.0");
        assert_eq!(chunk_filename("video.mp4", 12), "video.mp4.12");
    }
}
