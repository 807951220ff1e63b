use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use wreq::{Client, Method, Proxy};

/// One outbound POST to the image generator.
#[derive(Debug, Clone)]
pub struct UpstreamHttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct UpstreamHttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl UpstreamHttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamTransportErrorKind {
    Timeout,
    ReadTimeout,
    Connect,
    Dns,
    Tls,
    Other,
}

impl UpstreamTransportErrorKind {
    /// Failures that may clear up on a second try. `Other` covers request
    /// construction and protocol errors, which will not.
    pub fn is_retryable(self) -> bool {
        !matches!(self, UpstreamTransportErrorKind::Other)
    }
}

/// The upstream could not be reached or did not produce a complete reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("upstream transport error ({kind:?}): {message}")]
    Transport {
        kind: UpstreamTransportErrorKind,
        message: String,
    },
}

pub trait UpstreamClient: Send + Sync {
    fn send<'a>(
        &'a self,
        req: UpstreamHttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamHttpResponse, UpstreamFailure>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    pub proxy: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct WreqUpstreamClient {
    client: Client,
}

impl WreqUpstreamClient {
    pub fn new(config: UpstreamClientConfig) -> Result<Self, wreq::Error> {
        let proxy = normalize_proxy(config.proxy.clone());
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout);
        if let Some(proxy) = proxy.as_deref() {
            builder = builder.proxy(Proxy::all(proxy)?);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

fn normalize_proxy(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

impl UpstreamClient for WreqUpstreamClient {
    fn send<'a>(
        &'a self,
        req: UpstreamHttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamHttpResponse, UpstreamFailure>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut builder = self.client.request(Method::POST, &req.url);
            for (k, v) in &req.headers {
                builder = builder.header(k, v);
            }
            let resp = builder.body(req.body).send().await.map_err(map_wreq_error)?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await.map_err(map_wreq_error)?;
            Ok(UpstreamHttpResponse { status, body })
        })
    }
}

fn map_wreq_error(err: wreq::Error) -> UpstreamFailure {
    let kind = classify_wreq_error(&err);
    UpstreamFailure::Transport {
        kind,
        message: err.to_string(),
    }
}

fn classify_wreq_error(err: &wreq::Error) -> UpstreamTransportErrorKind {
    let message = err.to_string().to_ascii_lowercase();
    if err.is_timeout() {
        if message.contains("read") || message.contains("idle") {
            return UpstreamTransportErrorKind::ReadTimeout;
        }
        return UpstreamTransportErrorKind::Timeout;
    }
    if err.is_connect() {
        if message.contains("dns") || message.contains("resolve") {
            return UpstreamTransportErrorKind::Dns;
        }
        if message.contains("tls") || message.contains("ssl") {
            return UpstreamTransportErrorKind::Tls;
        }
        return UpstreamTransportErrorKind::Connect;
    }
    if err.is_connection_reset() {
        return UpstreamTransportErrorKind::Connect;
    }
    if message.contains("tls") || message.contains("ssl") {
        return UpstreamTransportErrorKind::Tls;
    }
    UpstreamTransportErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_proxy_is_ignored() {
        assert_eq!(normalize_proxy(Some("   ".to_string())), None);
        assert_eq!(
            normalize_proxy(Some(" http://127.0.0.1:3128 ".to_string())).as_deref(),
            Some("http://127.0.0.1:3128")
        );
    }

    #[test]
    fn only_other_transport_errors_are_terminal() {
        assert!(UpstreamTransportErrorKind::Timeout.is_retryable());
        assert!(UpstreamTransportErrorKind::Connect.is_retryable());
        assert!(UpstreamTransportErrorKind::Dns.is_retryable());
        assert!(!UpstreamTransportErrorKind::Other.is_retryable());
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = UpstreamHttpResponse {
            status: 204,
            body: Bytes::new(),
        };
        let redirect = UpstreamHttpResponse {
            status: 302,
            body: Bytes::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
