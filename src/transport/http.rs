use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{BoxStream, Error, ErrorContext, Result};

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub pool_max_idle_per_host: usize,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            proxy: None,
            pool_max_idle_per_host: 32,
            user_agent: None,
        }
    }
}

/// Status and fully-read body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Thin reqwest wrapper bound to one server base URL.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, config: &TransportConfig) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy url: {}", e),
                    ErrorContext::new().with_field_path("proxy").with_source("transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path (`/tts`, `control`, ...) against the base URL,
    /// keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Transport(TransportError::InvalidUrl(e.to_string())))
    }

    /// POST `body` as JSON and read the whole response.
    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<RawResponse> {
        let response = self.send_post_json(path, body).await?;
        read_response(response).await
    }

    /// GET with percent-encoded query pairs and read the whole response.
    pub async fn get_query<K, V>(&self, path: &str, query: &[(K, V)]) -> Result<RawResponse>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        debug!(method = "GET", url = %url, "sending request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::Http)?;
        read_response(response).await
    }

    /// POST `body` as JSON and hand back the response body as a byte stream.
    ///
    /// The status is returned alongside so callers can decide before draining.
    pub async fn post_json_stream<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(u16, BoxStream<'static, Bytes>)> {
        let response = self.send_post_json(path, body).await?;
        let status = response.status().as_u16();
        let stream = response
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok((status, Box::pin(stream)))
    }

    async fn send_post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_vec(body)?;
        debug!(method = "POST", url = %url, bytes = payload.len(), "sending request");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(TransportError::Http)?;
        Ok(response)
    }
}

async fn read_response(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(TransportError::Http)?;
    debug!(status, bytes = body.len(), "received response");
    Ok(RawResponse { status, body })
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base url '{}': {}", raw, e),
            ErrorContext::new().with_field_path("base_url").with_source("transport"),
        )
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("base url '{}' must be an http(s) URL", raw),
            ErrorContext::new().with_field_path("base_url").with_source("transport"),
        ));
    }
    // Url::join replaces the last segment unless the path ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, &TransportConfig::default()).unwrap()
    }

    #[test]
    fn joins_endpoints_without_double_slash() {
        let t = transport("http://127.0.0.1:9880/");
        assert_eq!(t.endpoint("/tts").unwrap().as_str(), "http://127.0.0.1:9880/tts");
        let t = transport("http://127.0.0.1:9880");
        assert_eq!(t.endpoint("control").unwrap().as_str(), "http://127.0.0.1:9880/control");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let t = transport("https://gpu.example.com/sovits");
        assert_eq!(
            t.endpoint("/set_gpt_weights").unwrap().as_str(),
            "https://gpu.example.com/sovits/set_gpt_weights"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        let err = HttpTransport::new("ftp://host", &TransportConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(HttpTransport::new("not a url", &TransportConfig::default()).is_err());
    }
}
