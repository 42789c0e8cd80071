use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http_client::{HttpClient, HttpClientTrait};
use super::listing::fetch_listing;
use super::locality::LocalityRewriter;
use super::timeout::TimeoutGuard;
use crate::domain::llm::CONTAINER_ENV_KEY;
use crate::domain::{
    ApiFlavor, BackendConfig, CatalogCache, DomainError, LlmBackend, ModelDescriptor,
    ModelHandle, ProviderRequest, ResolverEnv,
};

const PROVIDER_NAME: &str = "Ollama";
const DYNAMIC_MAX_INPUT_TOKENS: u32 = 8000;
const NUM_CTX_ENV_KEY: &str = "DEFAULT_NUM_CTX";
const DEFAULT_NUM_CTX: u32 = 32768;

/// Locally hosted Ollama server
#[derive(Debug)]
pub struct OllamaBackend<C: HttpClientTrait = HttpClient> {
    client: C,
    timeout: TimeoutGuard,
    config: BackendConfig,
    cache: CatalogCache,
}

impl<C: HttpClientTrait> OllamaBackend<C> {
    pub fn new(client: C) -> Self {
        let config = BackendConfig::new(PROVIDER_NAME)
            .with_base_url_env_key("OLLAMA_API_BASE_URL")
            .with_extra_env_key(CONTAINER_ENV_KEY)
            .with_api_key_link("https://ollama.com/download")
            .with_api_key_link_label("Download Ollama");

        Self {
            client,
            timeout: TimeoutGuard::catalog(),
            config,
            cache: CatalogCache::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: TimeoutGuard) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_url(&self, request: &ProviderRequest, env: &ResolverEnv) -> Result<String, DomainError> {
        let base_url = self.resolve_credential(request, env).base_url.ok_or_else(|| {
            DomainError::missing_credential(
                PROVIDER_NAME,
                "no base URL configured, set OLLAMA_API_BASE_URL or the provider base URL",
            )
        })?;

        Ok(LocalityRewriter::for_request(env, &request.server_env).apply(&base_url))
    }

    /// Context window passed to Ollama, from the leading digits of
    /// `DEFAULT_NUM_CTX` when present
    pub fn default_num_ctx(&self, request: &ProviderRequest, env: &ResolverEnv) -> u32 {
        env.lookup(NUM_CTX_ENV_KEY, &request.server_env)
            .and_then(|value| {
                let value = value.trim_start();
                let end = value
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(value.len());
                value[..end].parse().ok()
            })
            .unwrap_or(DEFAULT_NUM_CTX)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmBackend for OllamaBackend<C> {
    fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn catalog_cache(&self) -> &CatalogCache {
        &self.cache
    }

    async fn fetch_dynamic_models(
        &self,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<Vec<ModelDescriptor>, DomainError> {
        let base_url = self.base_url(request, env)?;
        let url = format!("{}/api/tags", base_url);

        let tags: OllamaTags =
            fetch_listing(&self.client, &self.timeout, PROVIDER_NAME, &url, None).await?;

        Ok(tags
            .models
            .into_iter()
            .map(|model| {
                let label = match model.details.parameter_size {
                    Some(size) => format!("{} ({})", model.name, size),
                    None => model.name.clone(),
                };
                ModelDescriptor::new(model.name, label, PROVIDER_NAME, DYNAMIC_MAX_INPUT_TOKENS)
            })
            .collect())
    }

    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError> {
        let base_url = self.base_url(request, env)?;
        debug!(provider = PROVIDER_NAME, base_url = %base_url, "Ollama base URL used");

        Ok(
            ModelHandle::new(PROVIDER_NAME, model, format!("{}/api", base_url), ApiFlavor::Ollama)
                .with_num_ctx(self.default_num_ctx(request, env)),
        )
    }
}

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
    #[serde(default)]
    details: OllamaModelDetails,
}

#[derive(Debug, Default, Deserialize)]
struct OllamaModelDetails {
    #[serde(default)]
    parameter_size: Option<String>,
}
