use super::hosted::{HostedBackend, HostedProfile};
use super::http_client::HttpClientTrait;
use crate::domain::BackendConfig;

const PROVIDER_NAME: &str = "Deepseek";
const MAX_COMPLETION_TOKENS: u32 = 8192;

/// Deepseek catalog. Every model shares the same completion budget.
pub fn profile() -> HostedProfile {
    let config = BackendConfig::new(PROVIDER_NAME)
        .with_api_token_env_key("DEEPSEEK_API_KEY")
        .with_default_base_url("https://api.deepseek.com")
        .with_api_key_link("https://platform.deepseek.com/apiKeys");

    let static_models = [
        ("deepseek-coder", "Deepseek-Coder", 8000),
        ("deepseek-chat", "Deepseek-Chat", 8000),
        ("deepseek-reasoner", "Deepseek-Reasoner", 8000),
        ("deepseek-v3.2", "DeepSeek V3.2 (Coding + Tool Use)", 64000),
        ("deepseek-v3.2-speciale", "DeepSeek V3.2 Speciale (High-Compute)", 64000),
    ]
    .into_iter()
    .map(|(name, label, tokens)| {
        config
            .model(name, label, tokens)
            .with_max_completion_tokens(MAX_COMPLETION_TOKENS)
    })
    .collect();

    HostedProfile {
        config: BackendConfig {
            static_models,
            ..config
        },
        models_path: "/models",
        handle_path: "/v1",
        dynamic_max_input_tokens: 64000,
        dynamic_max_completion_tokens: Some(MAX_COMPLETION_TOKENS),
    }
}

impl<C: HttpClientTrait> HostedBackend<C> {
    pub fn deepseek(client: C) -> Self {
        Self::new(client, profile())
    }
}
