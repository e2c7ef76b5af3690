/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client and the shared request proxy
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing proxy behavior
*/

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{KeymasterError, Result};

/// Default Keymaster service location
pub const DEFAULT_BASE_URL: &str = "http://localhost:4226";

/// Environment variable overriding the service location
pub const KEYMASTER_URL_ENV: &str = "KC_KEYMASTER_URL";

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Header carrying JSON options alongside binary uploads
pub const OPTIONS_HEADER: &str = "X-Options";

const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the base URL taken from `KC_KEYMASTER_URL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(KEYMASTER_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// HTTP client for the Keymaster REST API
#[derive(Debug, Clone)]
pub struct KeymasterClient {
    http_client: Client,
    base_url: Url,
}

impl KeymasterClient {
    /// Create a new client configured from the environment
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    /// Point the client at another Keymaster service
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.base_url = parse_base_url(url)?;
        Ok(())
    }

    /// Base URL of the Keymaster service
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/v1/{segments...}`.
    ///
    /// Every segment is percent-encoded on its own, so caller-supplied names
    /// cannot introduce extra path components or a query string.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| cannot_be_base(&self.base_url))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.api_url(segments)?;
        Ok(self.http_client.request(method, url))
    }

    /// Request with a raw binary body; `options` travel as JSON in `X-Options`
    pub(crate) fn octet_request<O>(
        &self,
        method: Method,
        segments: &[&str],
        data: Vec<u8>,
        options: Option<&O>,
    ) -> Result<RequestBuilder>
    where
        O: Serialize + ?Sized,
    {
        let mut builder = self
            .request(method, segments)?
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(data);

        if let Some(options) = options {
            builder = builder.header(OPTIONS_HEADER, serde_json::to_string(options)?);
        }

        Ok(builder)
    }

    /// Send a request; non-success statuses become `KeymasterError::Api`
    async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "keymaster request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        warn!(%method, %url, status = status.as_u16(), body = %text, "keymaster request failed");
        Err(KeymasterError::api_error(status, text))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send_checked(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request and return one top-level field of the JSON response
    pub(crate) async fn send_for_field<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        field: &str,
    ) -> Result<T> {
        let body: Value = self.send_json(builder).await?;
        extract_field(body, field)
    }

    pub(crate) async fn send_bytes(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.send_checked(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Binary download where 404 and an empty body both mean "absent"
    pub(crate) async fn send_optional_bytes(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<Vec<u8>>> {
        match self.send_bytes(builder).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(cannot_be_base(&url));
    }
    Ok(url)
}

fn cannot_be_base(url: &Url) -> KeymasterError {
    KeymasterError::Config(format!("base URL cannot carry a path: {url}"))
}

/// A missing field reads as `null`, so optional results come back as `None`
pub(crate) fn extract_field<T: DeserializeOwned>(mut body: Value, field: &str) -> Result<T> {
    let value = body.get_mut(field).map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|err| KeymasterError::InvalidResponse(format!("field `{field}`: {err}")))
}
