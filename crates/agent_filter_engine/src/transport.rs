use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use agent_filter_core::ProbeHeaders;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::{ProxyDescriptor, TransportError, TransportFailure};

/// One probe attempt, rebuilt for every try.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub target: String,
    pub headers: ProbeHeaders,
    pub proxy: Option<ProxyDescriptor>,
    pub timeout: Duration,
}

/// Issues a single GET and reports the response status.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError> {
        (**self).send(request).await
    }
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Skips TLS certificate verification. Off unless the operator opts in.
    pub accept_invalid_certs: bool,
    /// Off by default so a 3xx reaches the classifier as `Redirected`.
    pub follow_redirects: bool,
    pub redirect_limit: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            follow_redirects: false,
            redirect_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    settings: TransportSettings,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        proxy: Option<&ProxyDescriptor>,
        timeout: Duration,
    ) -> Result<reqwest::Client, TransportError> {
        let policy = if self.settings.follow_redirects {
            reqwest::redirect::Policy::limited(self.settings.redirect_limit)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .danger_accept_invalid_certs(self.settings.accept_invalid_certs);

        builder = match proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::https(proxy.as_str()).map_err(|err| {
                    TransportError::new(TransportFailure::Proxy, err.to_string())
                })?;
                builder.proxy(proxy)
            }
            // No descriptor means a direct connection, whatever the environment says.
            None => builder.no_proxy(),
        };

        builder
            .build()
            .map_err(|err| TransportError::new(TransportFailure::Other, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError> {
        let url = parse_target(&request.target)?;
        let headers = header_map(&request.headers)?;
        // Fresh client per attempt: no pooled connection survives a retry.
        let client = self.build_client(request.proxy.as_ref(), request.timeout)?;

        let response = client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|err| map_reqwest_error(&err, request.proxy.is_some()))?;

        Ok(response.status().as_u16())
    }
}

fn parse_target(target: &str) -> Result<Url, TransportError> {
    let url = Url::parse(target)
        .map_err(|err| TransportError::new(TransportFailure::InvalidUrl, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(TransportError::new(
            TransportFailure::InvalidUrl,
            format!("unsupported target url {target}"),
        ));
    }
    Ok(url)
}

fn header_map(headers: &ProbeHeaders) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.iter() {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            TransportError::new(TransportFailure::Other, format!("header {name}: {err}"))
        })?;
        let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|err| {
            TransportError::new(TransportFailure::Other, format!("header {name}: {err}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

fn map_reqwest_error(err: &reqwest::Error, proxied: bool) -> TransportError {
    let message = error_chain(err);
    let kind = if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_builder() {
        TransportFailure::InvalidUrl
    } else if proxied && mentions_proxy(&message) {
        TransportFailure::Proxy
    } else if err.is_connect() {
        TransportFailure::Connection
    } else {
        TransportFailure::Other
    };
    TransportError::new(kind, message)
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn mentions_proxy(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("proxy") || lower.contains("tunnel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_http_targets_are_invalid() {
        for target in ["not a url", "ftp://example.com/", "mailto:someone@example.com"] {
            let err = parse_target(target).unwrap_err();
            assert_eq!(err.kind, TransportFailure::InvalidUrl, "{target}");
        }
        assert!(parse_target("https://example.com/path?q=1").is_ok());
    }

    #[test]
    fn tunnel_failures_count_as_proxy_errors() {
        assert!(mentions_proxy("error sending request: unsuccessful tunnel"));
        assert!(mentions_proxy("Proxy Authentication Required"));
        assert!(!mentions_proxy("connection refused"));
    }

    #[test]
    fn control_characters_in_identity_are_rejected_before_sending() {
        let headers = agent_filter_core::HeaderTemplate::browser().for_identity("bad\nagent");
        let err = header_map(&headers).unwrap_err();
        assert_eq!(err.kind, TransportFailure::Other);
    }

    #[test]
    fn non_ascii_identity_is_sent_as_is() {
        let identity = "Mozilla/5.0 (Linux; Android 13; Téléphone)";
        let headers = agent_filter_core::HeaderTemplate::browser().for_identity(identity);
        let map = header_map(&headers).unwrap();
        assert_eq!(
            map.get(reqwest::header::USER_AGENT).map(HeaderValue::as_bytes),
            Some(identity.as_bytes())
        );
    }
}
