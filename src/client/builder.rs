use crate::client::core::SynthesisClient;
use crate::transport::{HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

/// Address the GPT-SoVITS `api_v2` server listens on by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9880";

/// Overall per-request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for creating clients with custom configuration.
///
/// Unset options fall back to the environment at [`build`](Self::build):
/// - `GPT_SOVITS_BASE_URL` (default `http://127.0.0.1:9880`)
/// - `GPT_SOVITS_TIMEOUT_SECS` (default 60)
/// - `GPT_SOVITS_PROXY_URL`
/// - `GPT_SOVITS_POOL_MAX_IDLE_PER_HOST` (default 32)
#[derive(Debug, Clone, Default)]
pub struct SynthesisClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    pool_max_idle_per_host: Option<usize>,
    user_agent: Option<String>,
}

impl SynthesisClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overall deadline for each call, connection through last body byte.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = Some(n);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<SynthesisClient> {
        let (base_url, config) = self.resolve(|key| env::var(key).ok())?;
        let transport = HttpTransport::new(&base_url, &config)?;
        tracing::debug!(base_url = %transport.base_url(), timeout = ?config.timeout, "synthesis client ready");
        Ok(SynthesisClient::from_transport(transport))
    }

    /// Merge explicit options with `lookup` (the environment in [`build`](Self::build)).
    fn resolve<F>(self, lookup: F) -> Result<(String, TransportConfig)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = self
            .base_url
            .or_else(|| lookup("GPT_SOVITS_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match self.timeout {
            Some(t) => t,
            None => parse_override::<u64>("GPT_SOVITS_TIMEOUT_SECS", lookup("GPT_SOVITS_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };
        if timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("timeout")
                    .with_source("builder"),
            ));
        }

        let pool_max_idle_per_host = match self.pool_max_idle_per_host {
            Some(n) => n,
            None => parse_override::<usize>(
                "GPT_SOVITS_POOL_MAX_IDLE_PER_HOST",
                lookup("GPT_SOVITS_POOL_MAX_IDLE_PER_HOST"),
            )?
            .unwrap_or(32),
        };

        let config = TransportConfig {
            timeout,
            proxy: self.proxy.or_else(|| lookup("GPT_SOVITS_PROXY_URL")),
            pool_max_idle_per_host,
            user_agent: Some(
                self.user_agent
                    .unwrap_or_else(|| format!("gpt-sovits-client/{}", env!("CARGO_PKG_VERSION"))),
            ),
        };
        Ok((base_url, config))
    }
}

/// Parse an optional numeric override.
///
/// A set-but-unparseable value is a configuration error rather than silently ignored.
fn parse_override<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("cannot parse {}='{}'", key, raw),
                ErrorContext::new().with_field_path(key).with_source("builder"),
            )
        }),
        None => Ok(None),
    }
}
