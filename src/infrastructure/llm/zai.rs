use async_trait::async_trait;

use super::http_client::{HttpClient, HttpClientTrait};
use super::listing::{ModelList, fetch_listing};
use super::signer::{CredentialSigner, is_valid_token};
use super::timeout::TimeoutGuard;
use crate::domain::{
    ApiFlavor, BackendConfig, CatalogCache, DomainError, LlmBackend, ModelDescriptor,
    ModelHandle, ProviderRequest, ResolverEnv,
};

const PROVIDER_NAME: &str = "Z.ai";

/// Z.ai GLM models. Requests carry an HMAC-signed token derived from an
/// `id.secret` API key rather than the key itself.
#[derive(Debug)]
pub struct ZaiBackend<C: HttpClientTrait = HttpClient> {
    client: C,
    timeout: TimeoutGuard,
    signer: CredentialSigner,
    config: BackendConfig,
    cache: CatalogCache,
}

impl<C: HttpClientTrait> ZaiBackend<C> {
    pub fn new(client: C) -> Self {
        let config = BackendConfig::new(PROVIDER_NAME)
            .with_base_url_env_key("ZAI_BASE_URL")
            .with_api_token_env_key("ZAI_API_KEY")
            .with_default_base_url("https://api.z.ai/api/coding/paas/v4")
            .with_api_key_link("https://open.bigmodel.cn/usercenter/apikeys");

        let static_models = vec![
            config
                .model("glm-4.6", "GLM-4.6 (200K)", 200000)
                .with_max_completion_tokens(65536),
            config
                .model("glm-4.5", "GLM-4.5 (128K)", 128000)
                .with_max_completion_tokens(65536),
            config
                .model("glm-4.5-flash", "GLM-4.5 Flash (128K)", 128000)
                .with_max_completion_tokens(65536),
        ];

        Self {
            client,
            timeout: TimeoutGuard::catalog(),
            signer: CredentialSigner::new(PROVIDER_NAME),
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

    /// Resolve the base URL and a freshly signed token
    fn signed_credential(
        &self,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<(String, String), DomainError> {
        let resolved = self.resolve_credential(request, env);

        let api_key = resolved.api_key.ok_or_else(|| {
            DomainError::missing_credential(PROVIDER_NAME, "no API key configured, set ZAI_API_KEY")
        })?;
        let base_url = resolved
            .base_url
            .ok_or_else(|| DomainError::missing_credential(PROVIDER_NAME, "no base URL configured"))?;

        let token = self.signer.generate_token(&api_key)?;
        if !is_valid_token(&token) {
            return Err(DomainError::invalid_credential_format(
                PROVIDER_NAME,
                "generated token is malformed",
            ));
        }

        Ok((base_url, token))
    }
}

/// Context window and completion budget by GLM family
fn glm_limits(id: &str) -> (u32, u32) {
    if id.contains("glm-4.6") {
        (200000, 65536)
    } else if id.contains("glm-4.5") {
        (128000, 65536)
    } else if id.contains("glm-4") {
        (128000, 8192)
    } else if id.contains("glm-3") {
        (32000, 4096)
    } else {
        (128000, 65536)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmBackend for ZaiBackend<C> {
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
        let (base_url, token) = self.signed_credential(request, env)?;
        let url = format!("{}/models", base_url);

        let list: ModelList =
            fetch_listing(&self.client, &self.timeout, PROVIDER_NAME, &url, Some(&token)).await?;

        Ok(list
            .data
            .into_iter()
            .filter(|m| m.object.as_deref() == Some("model") && m.id.starts_with("glm-"))
            .filter(|m| !self.config.is_static_model(&m.id))
            .map(|m| {
                let (context_window, max_completion) = glm_limits(&m.id);
                let label = format!("{} ({}k context)", m.id, context_window / 1000);
                ModelDescriptor::new(m.id, label, PROVIDER_NAME, context_window)
                    .with_max_completion_tokens(max_completion)
            })
            .collect())
    }

    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError> {
        let (base_url, token) = self.signed_credential(request, env)?;

        Ok(ModelHandle::new(PROVIDER_NAME, model, base_url, ApiFlavor::OpenAiCompatible)
            .with_credential(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const MODELS_URL: &str = "https://api.z.ai/api/coding/paas/v4/models";

    #[tokio::test]
    async fn test_zai_filters_to_new_glm_models() {
        let client = MockHttpClient::new().with_response(
            MODELS_URL,
            serde_json::json!({
                "data": [
                    {"id": "glm-4.6", "object": "model"},
                    {"id": "glm-4-plus", "object": "model"},
                    {"id": "glm-3-turbo", "object": "model"},
                    {"id": "embedding-3", "object": "model"},
                    {"id": "glm-4.5-air", "object": "other"}
                ]
            }),
        );
        let backend = ZaiBackend::new(client);
        let request = ProviderRequest::new().with_api_key(PROVIDER_NAME, "kid.ksecret");

        let models = backend.list_models(&request, &ResolverEnv::new()).await;
        let names: Vec<&str> = models.iter().map(|m| m.name()).collect();

        assert_eq!(
            names,
            vec!["glm-4.6", "glm-4.5", "glm-4.5-flash", "glm-4-plus", "glm-3-turbo"]
        );
        assert_eq!(models[3].label(), "glm-4-plus (128k context)");
        assert_eq!(models[3].max_completion_tokens(), Some(8192));
        assert_eq!(models[4].max_input_tokens(), 32000);
    }

    #[tokio::test]
    async fn test_zai_listing_uses_signed_token() {
        let client = MockHttpClient::new().with_response(MODELS_URL, serde_json::json!({"data": []}));
        let backend = ZaiBackend::new(client);
        let request = ProviderRequest::new().with_api_key(PROVIDER_NAME, "kid.ksecret");

        backend.list_models(&request, &ResolverEnv::new()).await;

        let auth = backend.client.last_header("Authorization").unwrap();
        let token = auth.strip_prefix("Bearer ").unwrap();
        assert!(is_valid_token(token));
        assert!(!token.contains("ksecret"));
    }

    #[tokio::test]
    async fn test_zai_without_key_keeps_static_and_skips_fetch() {
        let backend = ZaiBackend::new(MockHttpClient::new());

        let models = backend.list_models(&ProviderRequest::new(), &ResolverEnv::new()).await;

        assert_eq!(models.len(), 3);
        assert_eq!(backend.client.call_count(), 0);
    }

    #[test]
    fn test_zai_handle_carries_token() {
        let backend = ZaiBackend::new(MockHttpClient::new());
        let env = ResolverEnv::new().with_process_var("ZAI_API_KEY", "kid.ksecret");

        let handle = backend
            .create_model_handle("glm-4.6", &ProviderRequest::new(), &env)
            .unwrap();

        assert_eq!(handle.base_url(), "https://api.z.ai/api/coding/paas/v4");
        assert!(is_valid_token(handle.credential().unwrap()));
    }

    #[test]
    fn test_zai_handle_rejects_malformed_key() {
        let backend = ZaiBackend::new(MockHttpClient::new());
        let request = ProviderRequest::new().with_api_key(PROVIDER_NAME, "invalidkey");

        let result = backend.create_model_handle("glm-4.6", &request, &ResolverEnv::new());
        assert!(matches!(
            result,
            Err(DomainError::InvalidCredentialFormat { .. })
        ));
    }

    #[test]
    fn test_zai_handle_without_key_fails() {
        let backend = ZaiBackend::new(MockHttpClient::new());

        let result = backend.create_model_handle("glm-4.6", &ProviderRequest::new(), &ResolverEnv::new());
        assert!(matches!(result, Err(DomainError::MissingCredential { .. })));
    }

    #[test]
    fn test_glm_limits() {
        assert_eq!(glm_limits("glm-4.6-air"), (200000, 65536));
        assert_eq!(glm_limits("glm-4.5v"), (128000, 65536));
        assert_eq!(glm_limits("glm-4-long"), (128000, 8192));
        assert_eq!(glm_limits("glm-3-turbo"), (32000, 4096));
        assert_eq!(glm_limits("glm-z1"), (128000, 65536));
    }
}
