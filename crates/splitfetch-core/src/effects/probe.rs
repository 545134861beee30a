use crate::core::headers::{
    ACCEPT_RANGES, CONTENT_DISPOSITION, CONTENT_LENGTH, accepts_byte_ranges,
    content_disposition_filename, parse_content_length,
};
use crate::data::{ContentMetadata, DownloadTarget};
use crate::effects::http::{HttpClient, ResponseHead};
use crate::error::{Error, Result};

/// Discovers size, range support and a suggested filename with one `HEAD`.
pub struct CapabilityProbe<'a, C: HttpClient> {
    client: &'a C,
    headers: &'a [(String, String)],
}

impl<'a, C: HttpClient> CapabilityProbe<'a, C> {
    pub fn new(client: &'a C, headers: &'a [(String, String)]) -> Self {
        Self { client, headers }
    }

    /// A server without byte-range support is not an error here:
    /// `ranges_supported` is simply false.
    pub async fn probe(&self, target: &DownloadTarget) -> Result<ContentMetadata> {
        let head = self
            .client
            .head(target.as_str(), self.headers)
            .await
            .map_err(Error::transport)?;

        if !head.is_success() {
            return Err(Error::Status {
                status: head.status,
                url: target.as_str().to_string(),
            });
        }

        let metadata = metadata_from_head(&head)?;
        tracing::debug!(
            content_length = metadata.content_length,
            ranges_supported = metadata.ranges_supported,
            filename = metadata.filename.as_deref().unwrap_or("-"),
            "probed {}",
            target.as_str()
        );
        Ok(metadata)
    }
}

pub(crate) fn metadata_from_head(head: &ResponseHead) -> Result<ContentMetadata> {
    Ok(ContentMetadata {
        content_length: parse_content_length(head.header(CONTENT_LENGTH))?,
        filename: head
            .header(CONTENT_DISPOSITION)
            .and_then(content_disposition_filename),
        ranges_supported: accepts_byte_ranges(head.header(ACCEPT_RANGES)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(headers: &[(&str, &str)]) -> ResponseHead {
        ResponseHead {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn full_metadata() {
        let meta = metadata_from_head(&head(&[
            ("Content-Length", "42"),
            ("Accept-Ranges", "bytes"),
            ("Content-Disposition", "attachment; filename=\"data.bin\""),
        ]))
        .unwrap();
        assert_eq!(
            meta,
            ContentMetadata {
                content_length: 42,
                filename: Some("data.bin".into()),
                ranges_supported: true,
            }
        );
    }

    #[test]
    fn ranges_absent_still_succeeds() {
        let meta = metadata_from_head(&head(&[("Content-Length", "42")])).unwrap();
        assert!(!meta.ranges_supported);
        assert_eq!(meta.filename, None);
    }

    #[test]
    fn ranges_need_the_exact_token() {
        for value in ["BYTES", " bytes", "Bytes", "none"] {
            let meta =
                metadata_from_head(&head(&[("Content-Length", "42"), ("Accept-Ranges", value)]))
                    .unwrap();
            assert!(!meta.ranges_supported, "`{value}` enabled ranges");
            assert!(matches!(meta.require_ranges(), Err(Error::UnsupportedRange)));
        }
    }

    #[test]
    fn missing_length_fails() {
        let err = metadata_from_head(&head(&[("Accept-Ranges", "bytes")])).unwrap_err();
        assert!(matches!(err, Error::HeaderParse { .. }));
    }
}
