use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::RangeSpec;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Status line and headers of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A response whose body is still on the wire.
pub struct BodyResponse<E> {
    pub head: ResponseHead,
    pub body: BoxStream<'static, Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// This is the minimal interface the download pipeline needs. Implementations
/// handle their own redirects, timeouts and connection pooling, and must not
/// turn non-success statuses into errors: status checks belong to the caller.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - In-memory implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Issue a `HEAD` request and return the response head.
    fn head(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<ResponseHead, Self::Error>> + Send;

    /// Issue a `GET` request, restricted to `range` when given.
    fn get(
        &self,
        url: &str,
        range: Option<RangeSpec>,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<BodyResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use reqwest::header::{HeaderMap, RANGE};

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> crate::error::Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("splitfetch/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| crate::error::Error::RequestConstruction(e.to_string()))?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn to_head(status: reqwest::StatusCode, headers: &HeaderMap) -> ResponseHead {
        ResponseHead {
            status: status.as_u16(),
            headers: headers
                .iter()
                .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
                .collect(),
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<ResponseHead, Self::Error> {
            let mut request = self.client.head(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            Ok(to_head(response.status(), response.headers()))
        }

        async fn get(
            &self,
            url: &str,
            range: Option<RangeSpec>,
            headers: &[(String, String)],
        ) -> Result<BodyResponse<Self::Error>, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }
            if let Some(range) = range {
                request = request.header(RANGE, range.header_value());
            }

            let response = request.send().await?;
            let head = to_head(response.status(), response.headers());
            Ok(BodyResponse {
                head,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let head = ResponseHead {
            status: 200,
            headers: vec![("accept-ranges".into(), "bytes".into())],
        };
        assert_eq!(head.header("Accept-Ranges"), Some("bytes"));
        assert_eq!(head.header("Content-Length"), None);
    }

    #[test]
    fn success_range() {
        let mut head = ResponseHead::default();
        for (status, ok) in [(200, true), (206, true), (299, true), (304, false), (404, false)] {
            head.status = status;
            assert_eq!(head.is_success(), ok, "status {status}");
        }
    }
}
