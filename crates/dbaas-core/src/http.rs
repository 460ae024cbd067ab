//! `reqwest`-backed [`ServiceClient`]

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, trace, warn};

use crate::client::{ApiRequest, ApiResponse, Headers, Method, ServiceClient};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{Error, Result};

/// HTTP transport for the database service
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpServiceClient {
    /// Create a client for `endpoint` with default settings
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(endpoint))
    }

    /// Create a client from a loaded [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.normalized_endpoint()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let invalid = |reason: String| ConfigError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        debug!(endpoint = %endpoint, "created database service client");
        Ok(Self { http, endpoint })
    }

    /// Wrap an existing `reqwest::Client`
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = ClientConfig::new(endpoint).normalized_endpoint()?;
        Ok(Self { http, endpoint })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let ok_codes = request.opts.accepted_codes(request.method);
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .http
            .request(request.method.into(), &request.url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;
        trace!(status, len = bytes.len(), "response received");

        if !ok_codes.contains(&status) {
            warn!(
                method = %request.method,
                url = %request.url,
                status,
                "unexpected response status"
            );
            return Err(Error::UnexpectedStatus {
                method: request.method,
                url: request.url,
                expected: ok_codes,
                actual: status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// Keep only headers with printable values
fn collect_headers(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
