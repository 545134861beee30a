//! Parsing of the response headers the probe depends on.

use percent_encoding::percent_decode_str;

use super::filename::sanitize;
use crate::error::{Error, Result};

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const ACCEPT_RANGES: &str = "Accept-Ranges";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const RANGE: &str = "Range";

/// Parse a required, decimal `Content-Length` value.
pub fn parse_content_length(value: Option<&str>) -> Result<u64> {
    let value = value.ok_or_else(|| Error::HeaderParse {
        header: CONTENT_LENGTH,
        reason: "header missing".into(),
    })?;
    value.trim().parse::<u64>().map_err(|e| Error::HeaderParse {
        header: CONTENT_LENGTH,
        reason: format!("`{value}`: {e}"),
    })
}

/// True only for the literal value `bytes`; any other spelling, padding
/// included, disables ranged requests.
pub fn accepts_byte_ranges(value: Option<&str>) -> bool {
    value == Some("bytes")
}

/// Extract a safe filename from a `Content-Disposition` value.
///
/// `filename*` (RFC 5987, `charset'lang'percent-encoded`) is preferred over
/// plain `filename`. Values that sanitise to nothing yield `None`.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim();
        match key.as_str() {
            "filename" => plain = Some(unquote(raw)),
            "filename*" => extended = decode_extended(raw),
            _ => {}
        }
    }

    extended
        .and_then(|name| sanitize(&name))
        .or_else(|| plain.and_then(|name| sanitize(&name)))
}

/// Split on `;` outside of quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut begin = 0;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[begin..]);
    parts
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_extended(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_parses_decimal() {
        assert_eq!(parse_content_length(Some("1024")).unwrap(), 1024);
        assert_eq!(parse_content_length(Some(" 0 ")).unwrap(), 0);
    }

    #[test]
    fn content_length_missing_or_garbage() {
        assert!(matches!(
            parse_content_length(None),
            Err(Error::HeaderParse { header: CONTENT_LENGTH, .. })
        ));
        assert!(parse_content_length(Some("ten")).is_err());
        assert!(parse_content_length(Some("-1")).is_err());
    }

    #[test]
    fn accept_ranges_requires_bytes() {
        assert!(accepts_byte_ranges(Some("bytes")));
        assert!(!accepts_byte_ranges(Some(" Bytes ")));
        assert!(!accepts_byte_ranges(Some("BYTES")));
        assert!(!accepts_byte_ranges(Some("bytes ")));
        assert!(!accepts_byte_ranges(Some("none")));
        assert!(!accepts_byte_ranges(Some("")));
        assert!(!accepts_byte_ranges(None));
    }

    #[test]
    fn disposition_plain_and_quoted() {
        assert_eq!(
            content_disposition_filename("attachment; filename=report.pdf").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            content_disposition_filename(r#"attachment; filename="my; \"file\".txt""#).as_deref(),
            Some(r#"my; "file".txt"#)
        );
    }

    #[test]
    fn disposition_prefers_extended() {
        let value = "attachment; filename=\"fallback.bin\"; filename*=UTF-8''na%C3%AFve%20file.bin";
        assert_eq!(
            content_disposition_filename(value).as_deref(),
            Some("naïve file.bin")
        );
    }

    #[test]
    fn disposition_without_filename() {
        assert_eq!(content_disposition_filename("inline"), None);
        assert_eq!(content_disposition_filename("attachment; size=10"), None);
    }

    #[test]
    fn disposition_strips_directories() {
        assert_eq!(
            content_disposition_filename("attachment; filename=\"../../etc/passwd\"").as_deref(),
            Some("passwd")
        );
        assert_eq!(content_disposition_filename("attachment; filename=\"..\""), None);
    }
}
