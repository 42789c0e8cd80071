//! Hosted backends that authenticate with a bare bearer key and list models
//! in the OpenAI `{"data": [{"id": ...}]}` shape.

use async_trait::async_trait;
use tracing::debug;

use super::http_client::{HttpClient, HttpClientTrait};
use super::listing::{ModelList, fetch_listing};
use super::timeout::TimeoutGuard;
use crate::domain::{
    ApiFlavor, BackendConfig, CatalogCache, DomainError, LlmBackend, ModelDescriptor,
    ModelHandle, ProviderRequest, ResolverEnv,
};

/// Per-backend differences between hosted OpenAI-style backends
#[derive(Debug, Clone)]
pub struct HostedProfile {
    pub config: BackendConfig,
    /// Listing path appended to the resolved base URL
    pub models_path: &'static str,
    /// Path appended to the base URL for generation handles
    pub handle_path: &'static str,
    pub dynamic_max_input_tokens: u32,
    pub dynamic_max_completion_tokens: Option<u32>,
}

#[derive(Debug)]
pub struct HostedBackend<C: HttpClientTrait = HttpClient> {
    client: C,
    timeout: TimeoutGuard,
    profile: HostedProfile,
    cache: CatalogCache,
}

impl<C: HttpClientTrait> HostedBackend<C> {
    pub fn new(client: C, profile: HostedProfile) -> Self {
        Self {
            client,
            timeout: TimeoutGuard::catalog(),
            profile,
            cache: CatalogCache::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: TimeoutGuard) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    fn key_env_hint(&self) -> String {
        match self.profile.config.api_token_env_key {
            Some(key) => format!("no API key configured, set {}", key),
            None => "no API key configured".to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmBackend for HostedBackend<C> {
    fn config(&self) -> &BackendConfig {
        &self.profile.config
    }

    fn catalog_cache(&self) -> &CatalogCache {
        &self.cache
    }

    async fn fetch_dynamic_models(
        &self,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<Vec<ModelDescriptor>, DomainError> {
        let provider = self.name();
        let resolved = self.resolve_credential(request, env);
        let (Some(api_key), Some(base_url)) = (resolved.api_key, resolved.base_url) else {
            debug!(provider = provider, "No API key, skipping dynamic models");
            return Ok(Vec::new());
        };

        let url = format!("{}{}", base_url, self.profile.models_path);
        let list: ModelList =
            fetch_listing(&self.client, &self.timeout, provider, &url, Some(&api_key)).await?;

        Ok(list
            .data
            .into_iter()
            .filter(|m| !self.profile.config.is_static_model(&m.id))
            .map(|m| {
                let label = format!("{} (Dynamic)", m.id);
                let model = ModelDescriptor::new(
                    m.id,
                    label,
                    provider,
                    self.profile.dynamic_max_input_tokens,
                );
                match self.profile.dynamic_max_completion_tokens {
                    Some(tokens) => model.with_max_completion_tokens(tokens),
                    None => model,
                }
            })
            .collect())
    }

    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError> {
        let provider = self.name();
        let resolved = self.resolve_credential(request, env);

        let api_key = resolved
            .api_key
            .ok_or_else(|| DomainError::missing_credential(provider, self.key_env_hint()))?;
        let base_url = resolved
            .base_url
            .ok_or_else(|| DomainError::missing_credential(provider, "no base URL configured"))?;

        Ok(ModelHandle::new(
            provider,
            model,
            format!("{}{}", base_url, self.profile.handle_path),
            ApiFlavor::OpenAiCompatible,
        )
        .with_credential(api_key))
    }
}
