use crate::core::errors::OllamaError;
use reqwest::Method;
use std::collections::HashMap;
use url::Url;

/// A logical API operation that can be turned into a concrete HTTP request.
///
/// Implementations supply the path, method, default headers and optional
/// body; [`RequestBuilder`] owns the address composition and header merge.
pub trait Endpoint {
    /// Path appended to the base address, always starting with `/`
    fn path(&self) -> &'static str;

    /// HTTP method for this operation
    fn method(&self) -> Method;

    /// Headers sent unless the caller overrides them
    fn default_headers(&self) -> HashMap<String, String>;

    /// Serialized JSON body, or `None` for payload-free operations
    fn encode_body(&self) -> Result<Option<Vec<u8>>, OllamaError>;
}

/// A fully resolved outbound request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Look up a header by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parse the body back as JSON
    pub fn json_body(&self) -> Result<Option<serde_json::Value>, OllamaError> {
        self.body
            .as_deref()
            .map(serde_json::from_slice)
            .transpose()
            .map_err(|e| OllamaError::DecodingError(format!("Request body is not JSON: {}", e)))
    }
}

/// Composes a base address, an endpoint and header overrides into an
/// [`OutboundRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add caller header overrides; later calls win over earlier ones
    pub fn with_headers(mut self, headers: &HashMap<String, String>) -> Self {
        for (key, value) in headers {
            insert_header(&mut self.headers, key.clone(), value.clone());
        }
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn build<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<OutboundRequest, OllamaError> {
        let url = join_url(&self.base_url, endpoint.path())?;
        let headers = merge_headers(endpoint.default_headers(), &self.headers);
        let body = endpoint.encode_body()?;

        Ok(OutboundRequest {
            method: endpoint.method(),
            url,
            headers,
            body,
        })
    }
}

/// Append `path` to the path of `base_url`, keeping any prefix the base carries.
pub fn join_url(base_url: &str, path: &str) -> Result<Url, OllamaError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        OllamaError::AddressError(format!("Invalid base URL '{}': {}", base_url, e))
    })?;

    if url.cannot_be_a_base() {
        return Err(OllamaError::AddressError(format!(
            "Base URL '{}' cannot carry a path",
            base_url
        )));
    }

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    Ok(url)
}

/// Merge caller headers over defaults; caller entries win on collision.
///
/// Header names compare case-insensitively, so `content-type` replaces
/// `Content-Type` instead of sitting next to it.
pub fn merge_headers(
    defaults: HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = defaults;
    for (key, value) in overrides {
        insert_header(&mut merged, key.clone(), value.clone());
    }
    merged
}

fn insert_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}
