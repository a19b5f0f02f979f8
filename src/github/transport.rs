// src/github/transport.rs
// =============================================================================
// The HTTP layer used to download raw files.
//
// - Transport: a small trait with one async `get`, so the client can be
//   driven by reqwest in production and by a stub in tests
// - RawTransport: the reqwest implementation, pointed at
//   raw.githubusercontent.com
// - expand_template: turns "/:owner/:repo/:branch/:path" plus a map of values
//   into a full URL, escaping every path segment
//
// A non-2xx answer is NOT an error here. raw.githubusercontent.com answers a
// missing file with "404: Not Found" as the body, and that body is handed
// back as the file contents. Callers must not take a successful result as
// proof that the file exists.
//
// Rust concepts:
// - async-trait: async methods in a trait that can be used as `dyn Transport`
// - Builder pattern: RawTransport::builder() for optional settings
// =============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::error::TransportError;

/// Host serving raw file contents for GitHub repositories.
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("github-content/", env!("CARGO_PKG_VERSION"));

/// Options passed through to the transport untouched by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Sent as `Authorization: token <value>`.
    pub token: Option<String>,
    /// Overrides the transport's default `User-Agent`.
    pub user_agent: Option<String>,
}

impl TransportOptions {
    /// Field-by-field merge, `overrides` winning wherever it has a value.
    pub fn merged(&self, overrides: &TransportOptions) -> TransportOptions {
        TransportOptions {
            token: overrides.token.clone().or_else(|| self.token.clone()),
            user_agent: overrides
                .user_agent
                .clone()
                .or_else(|| self.user_agent.clone()),
        }
    }
}

/// Everything a single GET needs besides the template itself.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Values for the `:name` placeholders of the template.
    pub params: BTreeMap<String, String>,
    pub transport: TransportOptions,
}

/// Performs a GET for a templated path and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, template: &str, options: &RequestOptions) -> Result<Vec<u8>, TransportError>;
}

// Builds the request URL from a base URL and a template such as
// "/:owner/:repo/:branch/:path".
//
// Each placeholder value may itself contain '/' (the file path does); it is
// split and every piece is pushed as its own, escaped, segment. Empty pieces
// are skipped so "docs//a.md" and "/docs/a.md" still produce clean URLs.
//
// The url crate drops "." and applies ".." while pushing, so "a/./b.md"
// becomes "a/b.md" and "../x.md" becomes "x.md". GithubContent rejects such
// paths before they get here.
pub fn expand_template(
    base: &Url,
    template: &str,
    params: &BTreeMap<String, String>,
) -> Result<Url, TransportError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| TransportError::InvalidBaseUrl(base.to_string()))?;
        segments.pop_if_empty();

        for part in template.split('/').filter(|p| !p.is_empty()) {
            match part.strip_prefix(':') {
                Some(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| TransportError::MissingParam(name.to_string()))?;
                    segments.extend(value.split('/').filter(|s| !s.is_empty()));
                }
                None => {
                    segments.push(part);
                }
            }
        }
    }
    Ok(url)
}

/// reqwest-backed [`Transport`] for raw.githubusercontent.com.
#[derive(Debug, Clone)]
pub struct RawTransport {
    client: Client,
    base_url: Url,
}

impl RawTransport {
    /// Transport against [`RAW_CONTENT_URL`] with default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    pub fn builder() -> RawTransportBuilder {
        RawTransportBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for RawTransport {
    async fn get(&self, template: &str, options: &RequestOptions) -> Result<Vec<u8>, TransportError> {
        let url = expand_template(&self.base_url, template, &options.params)?;
        log::debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(token) = &options.transport.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        if let Some(agent) = &options.transport.user_agent {
            request = request.header(USER_AGENT, agent.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!(
                "{} answered HTTP {}, returning the body as file contents",
                url,
                status.as_u16()
            );
        }

        let body = response.bytes().await?;
        log::debug!("{} -> {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}

/// Optional settings for [`RawTransport`].
#[derive(Debug, Clone)]
pub struct RawTransportBuilder {
    base_url: String,
    timeout: Duration,
    client: Option<Client>,
}

impl Default for RawTransportBuilder {
    fn default() -> Self {
        RawTransportBuilder {
            base_url: RAW_CONTENT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }
}

impl RawTransportBuilder {
    /// Serve files from another host (a mirror, or a mock server in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout. Ignored when a prebuilt client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing reqwest client (connection pool, proxies, ...).
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<RawTransport, TransportError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| TransportError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl(self.base_url));
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .user_agent(DEFAULT_USER_AGENT)
                .build()?,
        };

        Ok(RawTransport { client, base_url })
    }
}
