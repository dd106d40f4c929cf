use crate::core::config::ClientConfig;
use crate::core::errors::OllamaError;
use crate::core::kernel::request::OutboundRequest;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{instrument, trace};

/// Transport trait for sending built requests
///
/// The kernel hands a fully resolved [`OutboundRequest`] to the transport and
/// gets raw bytes or a decoded value back. Connection handling, timeouts and
/// TLS live entirely behind this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response body
    ///
    /// Fails with `TransportError` on connectivity problems and `ApiError`
    /// on non-2xx responses.
    async fn send(&self, request: OutboundRequest) -> Result<Vec<u8>, OllamaError>;

    /// Send the request and decode the response body as `T`
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, OllamaError> {
        let body = self.send(request).await?;
        decode_json(&body)
    }
}

pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, OllamaError> {
    serde_json::from_slice(body).map_err(|e| {
        OllamaError::DecodingError(format!("Failed to deserialize JSON: {}", e))
    })
}

/// Configuration for the reqwest transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self {
            timeout_seconds: crate::core::config::DEFAULT_TIMEOUT_SECONDS,
            user_agent: crate::core::config::DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ClientConfig> for TransportConfig {
    fn from(config: &ClientConfig) -> Self {
        Self::new()
            .with_timeout(config.timeout_seconds)
            .with_user_agent(config.user_agent.clone())
    }
}

/// Implementation of `Transport` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, OllamaError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                OllamaError::TransportError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

/// Convert merged headers into a `HeaderMap`, one value per name.
fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, OllamaError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| OllamaError::EncodingError(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| OllamaError::EncodingError(format!("Invalid value for header '{}': {}", key, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: OutboundRequest) -> Result<Vec<u8>, OllamaError> {
        let headers = header_map(&request.headers)?;
        let mut builder = self.client.request(request.method, request.url).headers(headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| OllamaError::TransportError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            OllamaError::TransportError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", String::from_utf8_lossy(&body));

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(OllamaError::ApiError {
                code: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}
