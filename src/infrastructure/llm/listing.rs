//! Shared model-listing plumbing for the backend adapters

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::http_client::HttpClientTrait;
use super::timeout::TimeoutGuard;
use crate::domain::DomainError;

/// OpenAI-style `{"data": [...]}` listing
#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub context_length: Option<u32>,
}

/// Issue one bounded GET against a listing endpoint and decode it as `T`
pub(crate) async fn fetch_listing<C, T>(
    client: &C,
    timeout: &TimeoutGuard,
    provider: &str,
    url: &str,
    bearer: Option<&str>,
) -> Result<T, DomainError>
where
    C: HttpClientTrait,
    T: DeserializeOwned,
{
    let auth_header = bearer.map(|token| format!("Bearer {}", token));
    let mut headers = vec![("Content-Type", "application/json")];
    if let Some(ref value) = auth_header {
        headers.push(("Authorization", value.as_str()));
    }

    debug!(provider = provider, url = url, "Fetching model listing");

    let operation = format!("{} model listing at {}", provider, url);
    let body = timeout
        .run(&operation, client.get_json(provider, url, headers))
        .await?;

    serde_json::from_value(body).map_err(|e| {
        DomainError::provider(provider, format!("Unexpected model listing shape: {}", e))
    })
}
