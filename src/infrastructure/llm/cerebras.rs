use super::hosted::{HostedBackend, HostedProfile};
use super::http_client::HttpClientTrait;
use crate::domain::BackendConfig;

const PROVIDER_NAME: &str = "Cerebras";

pub fn profile() -> HostedProfile {
    let config = BackendConfig::new(PROVIDER_NAME)
        .with_api_token_env_key("CEREBRAS_API_KEY")
        .with_default_base_url("https://api.cerebras.ai/v1")
        .with_api_key_link("https://cloud.cerebras.ai/settings");

    let static_models = [
        ("qwen3-coder-480b", "Qwen3-Coder 480B (2000 tok/s, Best for Coding)", 262000),
        ("llama3.1-8b", "Llama 3.1 8B", 8000),
        ("gpt-oss-120b", "GPT OSS 120B (Reasoning)", 8000),
        ("qwen-3-235b-a22b-instruct-2507", "Qwen 3 235B A22B Instruct", 8000),
        ("qwen-3-235b-a22b-thinking-2507", "Qwen 3 235B A22B Thinking", 8000),
        ("zai-glm-4.6", "ZAI GLM 4.6 (Coding: 73.8% SWE-bench)", 8000),
        ("zai-glm-4.7", "ZAI GLM 4.7 (Reasoning)", 8000),
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
        dynamic_max_input_tokens: 32000,
        dynamic_max_completion_tokens: None,
    }
}

impl<C: HttpClientTrait> HostedBackend<C> {
    pub fn cerebras(client: C) -> Self {
        Self::new(client, profile())
    }
}
