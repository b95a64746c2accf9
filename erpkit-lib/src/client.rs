//! Main ErpClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::RequestBuilder;
use serde_json::Map;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::model::FilterParams;
use crate::model::ListEnvelope;
use crate::model::unwrap_record;

/// Client for the ERP REST backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use erpkit_lib::ErpClient;
///
/// let client = ErpClient::builder()
///     .url("https://erp.example.com/api/")
///     .token("secret")
///     .build()?;
///
/// let roles = client.list("roles", &FilterParams::new()).await?;
/// ```
#[derive(Clone)]
pub struct ErpClient {
    inner: Arc<ErpClientInner>,
}

struct ErpClientInner {
    base_url: Url,
    token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ErpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_token", &self.inner.token.is_some())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl ErpClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ErpClientBuilder<Missing> {
        ErpClientBuilder::new()
    }

    /// Returns the base URL of the backend.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// Leading slashes are ignored so `"/roles"` and `"roles"` both resolve
    /// under the base path.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    /// `GET` a list endpoint and return its rows.
    ///
    /// Accepts a bare array, `{data: [..]}` or `{items: [..]}`.
    pub async fn list(&self, endpoint: &str, params: &FilterParams) -> Result<Vec<Value>, ApiError> {
        let mut url = self.endpoint_url(endpoint)?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params.iter() {
                query.append_pair(key, value);
            }
        }

        log::debug!("GET {}", url);
        let request = self.inner.http_client.get(url);
        let body = self.send(request).await?;
        ListEnvelope::parse(&body)
    }

    /// `POST` a `{field: value}` payload and return the created record.
    ///
    /// A `{data: record}` response is unwrapped.
    pub async fn create(&self, endpoint: &str, payload: &Map<String, Value>) -> Result<Value, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        log::debug!("POST {} fields={:?}", url, payload.keys().collect::<Vec<_>>());

        let request = self.inner.http_client.post(url).json(payload);
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), &body))?;
        Ok(unwrap_record(value))
    }

    async fn send(&self, mut request: RequestBuilder) -> Result<String, ApiError> {
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            Ok(body)
        } else {
            log::warn!("Request failed with HTTP {}", status.as_u16());
            Err(ApiError::from_body(status.as_u16(), &body))
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ErpClient`].
///
/// Uses the typestate pattern so `build()` is only available once the base
/// URL has been set.
///
/// # Example
///
/// ```ignore
/// let client = ErpClient::builder()
///     .url("https://erp.example.com/api/")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct ErpClientBuilder<U> {
    url: U,
    token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ErpClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the backend base URL.
    pub fn url(self, url: impl Into<String>) -> ErpClientBuilder<Set<String>> {
        ErpClientBuilder {
            url: Set(url.into()),
            token: self.token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ErpClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ErpClientBuilder<U> {
    /// Sets a static bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ErpClientBuilder<Set<String>> {
    /// Builds the [`ErpClient`].
    ///
    /// The base URL gets a trailing slash if it lacks one, so relative
    /// endpoints resolve beneath it instead of replacing its last segment.
    pub fn build(self) -> Result<ErpClient, ApiError> {
        let raw = self.url.0;
        let normalized = if raw.ends_with('/') {
            raw.clone()
        } else {
            format!("{raw}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(ErpClient {
            inner: Arc::new(ErpClientInner {
                base_url,
                token: self.token,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolves_under_base_path() {
        let client = ErpClient::builder().url("https://erp.example.com/api").build().unwrap();
        assert_eq!(
            client.endpoint_url("/roles").unwrap().as_str(),
            "https://erp.example.com/api/roles"
        );
        assert_eq!(
            client.endpoint_url("items/categories").unwrap().as_str(),
            "https://erp.example.com/api/items/categories"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ErpClient::builder().url("not a url").build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
