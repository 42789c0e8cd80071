use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// GET `url` and decode the body as JSON.
    ///
    /// Errors are attributed to `provider`: connection failures become
    /// `BackendUnreachable`, non-2xx statuses `UpstreamHttp`, undecodable
    /// bodies `Provider`.
    async fn get_json(
        &self,
        provider: &str,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            request_timeout: None,
        }
    }

    /// Client whose every request is bounded at the transport level
    pub fn with_request_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_timeout: Some(timeout),
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        provider: &str,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                let timeout_ms = self.request_timeout.map_or(0, |t| t.as_millis() as u64);
                DomainError::timeout(format!("GET {}", url), timeout_ms)
            } else {
                DomainError::backend_unreachable(provider, format!("{} not reachable: {}", url, e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream_http(
                provider,
                status.as_u16(),
                format!("{} {}", status.canonical_reason().unwrap_or(""), error_body)
                    .trim()
                    .to_string(),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider(provider, format!("Failed to parse model listing: {}", e))
        })
    }
}
