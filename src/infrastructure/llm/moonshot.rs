use super::hosted::{HostedBackend, HostedProfile};
use super::http_client::HttpClientTrait;
use crate::domain::BackendConfig;

const PROVIDER_NAME: &str = "Moonshot";

/// Moonshot (Kimi) catalog and endpoints
pub fn profile() -> HostedProfile {
    let config = BackendConfig::new(PROVIDER_NAME)
        .with_api_token_env_key("MOONSHOT_API_KEY")
        .with_default_base_url("https://api.moonshot.ai/v1")
        .with_api_key_link("https://platform.moonshot.ai/console/api-keys");

    let static_models = [
        ("moonshot-v1-8k", "Moonshot v1 8K", 8000),
        ("moonshot-v1-32k", "Moonshot v1 32K", 32000),
        ("moonshot-v1-128k", "Moonshot v1 128K", 128000),
        ("moonshot-v1-auto", "Moonshot v1 Auto", 128000),
        ("moonshot-v1-8k-vision-preview", "Moonshot v1 8K Vision", 8000),
        ("moonshot-v1-32k-vision-preview", "Moonshot v1 32K Vision", 32000),
        ("moonshot-v1-128k-vision-preview", "Moonshot v1 128K Vision", 128000),
        ("kimi-latest", "Kimi Latest", 128000),
        ("kimi-k2-0711-preview", "Kimi K2 Preview", 128000),
        ("kimi-k2-turbo-preview", "Kimi K2 Turbo", 128000),
        ("kimi-thinking-preview", "Kimi Thinking", 128000),
    ]
    .into_iter()
    .map(|(name, label, tokens)| config.model(name, label, tokens))
    .collect();

    HostedProfile {
        config: BackendConfig {
            static_models,
            ..config
        },
        models_path: "/models",
        handle_path: "",
        dynamic_max_input_tokens: 128000,
        dynamic_max_completion_tokens: None,
    }
}

impl<C: HttpClientTrait> HostedBackend<C> {
    pub fn moonshot(client: C) -> Self {
        Self::new(client, profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, LlmBackend, ProviderRequest, ResolverEnv};
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    #[tokio::test]
    async fn test_moonshot_appends_unknown_models() {
        let client = MockHttpClient::new().with_response(
            "https://api.moonshot.ai/v1/models",
            serde_json::json!({
                "data": [
                    {"id": "kimi-latest", "object": "model"},
                    {"id": "kimi-k2-0905-preview", "object": "model"}
                ]
            }),
        );
        let backend = HostedBackend::moonshot(client);
        let env = ResolverEnv::new().with_process_var("MOONSHOT_API_KEY", "sk-moon");

        let models = backend.list_models(&ProviderRequest::new(), &env).await;

        assert_eq!(models.len(), 12);
        let last = models.last().unwrap();
        assert_eq!(last.name(), "kimi-k2-0905-preview");
        assert_eq!(last.label(), "kimi-k2-0905-preview (Dynamic)");
        assert_eq!(last.max_input_tokens(), 128000);
        assert_eq!(backend.client().last_header("authorization").as_deref(), Some("Bearer sk-moon"));
    }

    #[test]
    fn test_moonshot_handle_uses_base_url() {
        let backend = HostedBackend::moonshot(MockHttpClient::new());
        let request = ProviderRequest::new().with_api_key(PROVIDER_NAME, "sk-moon");

        let handle = backend
            .create_model_handle("kimi-latest", &request, &ResolverEnv::new())
            .unwrap();

        assert_eq!(handle.base_url(), "https://api.moonshot.ai/v1");
        assert_eq!(handle.credential(), Some("sk-moon"));
    }

    #[test]
    fn test_moonshot_handle_without_key() {
        let backend = HostedBackend::moonshot(MockHttpClient::new());

        let err = backend
            .create_model_handle("kimi-latest", &ProviderRequest::new(), &ResolverEnv::new())
            .unwrap_err();

        assert!(matches!(err, DomainError::MissingCredential { .. }));
        assert!(err.to_string().contains("MOONSHOT_API_KEY"));
    }
}
