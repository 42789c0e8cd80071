use async_trait::async_trait;
use tracing::debug;

use super::http_client::{HttpClient, HttpClientTrait};
use super::listing::{ModelList, fetch_listing};
use super::timeout::TimeoutGuard;
use crate::domain::{
    ApiFlavor, BackendConfig, CatalogCache, DomainError, LlmBackend, ModelDescriptor,
    ModelHandle, ProviderRequest, ResolverEnv,
};

const PROVIDER_NAME: &str = "Fireworks";
const MODEL_PATH_PREFIX: &str = "accounts/fireworks/models/";
const DYNAMIC_MAX_INPUT_TOKENS: u32 = 128000;

/// Fireworks AI hosted inference
#[derive(Debug)]
pub struct FireworksBackend<C: HttpClientTrait = HttpClient> {
    client: C,
    timeout: TimeoutGuard,
    config: BackendConfig,
    cache: CatalogCache,
}

impl<C: HttpClientTrait> FireworksBackend<C> {
    pub fn new(client: C) -> Self {
        let config = BackendConfig::new(PROVIDER_NAME)
            .with_api_token_env_key("FIREWORKS_API_KEY")
            .with_default_base_url("https://api.fireworks.ai")
            .with_api_key_link("https://fireworks.ai/api-keys");

        let static_models = [
            ("qwen3-coder-480b-a35b-instruct", "Qwen3-Coder 480B (Best for Coding)", 262000),
            ("qwen3-coder-30b-a3b-instruct", "Qwen3-Coder 30B (Fast Coding)", 262000),
            ("llama-v3p1-405b-instruct", "Llama 3.1 405B Instruct", 128000),
            ("llama-v3p1-70b-instruct", "Llama 3.1 70B Instruct", 128000),
            ("llama-v3p1-8b-instruct", "Llama 3.1 8B Instruct", 128000),
            ("deepseek-r1", "DeepSeek R1 (Reasoning)", 64000),
            ("qwen2p5-72b-instruct", "Qwen 2.5 72B Instruct", 128000),
            ("firefunction-v2", "FireFunction V2", 8000),
        ]
        .into_iter()
        .map(|(id, label, tokens)| config.model(&format!("{}{}", MODEL_PATH_PREFIX, id), label, tokens))
        .collect();

        Self {
            client,
            timeout: TimeoutGuard::catalog(),
            config: BackendConfig {
                static_models,
                ..config
            },
            cache: CatalogCache::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: TimeoutGuard) -> Self {
        self.timeout = timeout;
        self
    }

    fn is_known(&self, id: &str) -> bool {
        self.config.is_static_model(id)
            || self
                .config
                .is_static_model(&format!("{}{}", MODEL_PATH_PREFIX, id))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmBackend for FireworksBackend<C> {
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
        let resolved = self.resolve_credential(request, env);
        let (Some(api_key), Some(base_url)) = (resolved.api_key, resolved.base_url) else {
            debug!(provider = PROVIDER_NAME, "No API key, skipping dynamic models");
            return Ok(Vec::new());
        };

        let url = format!("{}/v1/accounts/fireworks/models?page_size=100", base_url);
        let list: ModelList =
            fetch_listing(&self.client, &self.timeout, PROVIDER_NAME, &url, Some(&api_key)).await?;

        Ok(list
            .data
            .into_iter()
            .filter(|m| !self.is_known(&m.id))
            .map(|m| {
                ModelDescriptor::new(
                    format!("{}{}", MODEL_PATH_PREFIX, m.id),
                    format!("{} (Dynamic)", m.id),
                    PROVIDER_NAME,
                    m.context_length.unwrap_or(DYNAMIC_MAX_INPUT_TOKENS),
                )
            })
            .collect())
    }

    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError> {
        let resolved = self.resolve_credential(request, env);
        let api_key = resolved.api_key.ok_or_else(|| {
            DomainError::missing_credential(PROVIDER_NAME, "no API key configured, set FIREWORKS_API_KEY")
        })?;
        let base_url = resolved
            .base_url
            .ok_or_else(|| DomainError::missing_credential(PROVIDER_NAME, "no base URL configured"))?;

        Ok(ModelHandle::new(
            PROVIDER_NAME,
            model,
            format!("{}/inference/v1", base_url),
            ApiFlavor::OpenAiCompatible,
        )
        .with_credential(api_key))
    }
}
