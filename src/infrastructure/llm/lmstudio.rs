use async_trait::async_trait;
use tracing::debug;

use super::http_client::{HttpClient, HttpClientTrait};
use super::listing::{ModelList, fetch_listing};
use super::locality::LocalityRewriter;
use super::timeout::TimeoutGuard;
use crate::domain::llm::CONTAINER_ENV_KEY;
use crate::domain::{
    ApiFlavor, BackendConfig, CatalogCache, DomainError, LlmBackend, ModelDescriptor,
    ModelHandle, ProviderRequest, ResolverEnv,
};

const PROVIDER_NAME: &str = "LMStudio";
const DYNAMIC_MAX_INPUT_TOKENS: u32 = 8000;

/// Locally hosted LM Studio server (OpenAI-compatible, no key)
#[derive(Debug)]
pub struct LmStudioBackend<C: HttpClientTrait = HttpClient> {
    client: C,
    timeout: TimeoutGuard,
    config: BackendConfig,
    cache: CatalogCache,
}

impl<C: HttpClientTrait> LmStudioBackend<C> {
    pub fn new(client: C) -> Self {
        let config = BackendConfig::new(PROVIDER_NAME)
            .with_base_url_env_key("LMSTUDIO_API_BASE_URL")
            .with_default_base_url("http://localhost:1234/")
            .with_extra_env_key(CONTAINER_ENV_KEY)
            .with_api_key_link("https://lmstudio.ai/")
            .with_api_key_link_label("Get LMStudio");

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
            DomainError::missing_credential(PROVIDER_NAME, "no base URL configured")
        })?;

        Ok(LocalityRewriter::for_request(env, &request.server_env).apply(&base_url))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmBackend for LmStudioBackend<C> {
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
        let url = format!("{}/v1/models", self.base_url(request, env)?);

        let list: ModelList =
            fetch_listing(&self.client, &self.timeout, PROVIDER_NAME, &url, None).await?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ModelDescriptor::new(m.id.clone(), m.id, PROVIDER_NAME, DYNAMIC_MAX_INPUT_TOKENS))
            .collect())
    }

    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError> {
        let base_url = self.base_url(request, env)?;
        debug!(provider = PROVIDER_NAME, base_url = %base_url, "LMStudio base URL used");

        Ok(ModelHandle::new(
            PROVIDER_NAME,
            model,
            format!("{}/v1", base_url),
            ApiFlavor::OpenAiCompatible,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderSettings;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    #[tokio::test]
    async fn test_lmstudio_lists_default_server() {
        let client = MockHttpClient::new().with_response(
            "http://localhost:1234/v1/models",
            serde_json::json!({"data": [{"id": "qwen2.5-7b-instruct"}]}),
        );
        let backend = LmStudioBackend::new(client);

        let models = backend.list_models(&ProviderRequest::new(), &ResolverEnv::new()).await;

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name(), "qwen2.5-7b-instruct");
        assert_eq!(models[0].label(), "qwen2.5-7b-instruct");
    }

    #[tokio::test]
    async fn test_lmstudio_unreachable_returns_empty() {
        let client = MockHttpClient::new()
            .with_error("http://localhost:1234/v1/models", "connection refused");
        let backend = LmStudioBackend::new(client);

        let models = backend.list_models(&ProviderRequest::new(), &ResolverEnv::new()).await;
        assert!(models.is_empty());
    }

    #[test]
    fn test_lmstudio_container_rewrite() {
        let backend = LmStudioBackend::new(MockHttpClient::new());
        let request = ProviderRequest::new()
            .with_settings(
                PROVIDER_NAME,
                ProviderSettings::default().with_base_url("http://localhost:1234/"),
            )
            .with_env(CONTAINER_ENV_KEY, "true");

        let handle = backend
            .create_model_handle("qwen", &request, &ResolverEnv::new())
            .unwrap();

        assert_eq!(handle.base_url(), "http://host.docker.internal:1234/v1");
        assert_eq!(handle.credential(), None);
    }

    #[test]
    fn test_lmstudio_default_handle_without_container() {
        let backend = LmStudioBackend::new(MockHttpClient::new());

        let handle = backend
            .create_model_handle("qwen", &ProviderRequest::new(), &ResolverEnv::new())
            .unwrap();
        assert_eq!(handle.base_url(), "http://localhost:1234/v1");
    }
}
