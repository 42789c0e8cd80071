use anyhow::Context;
use serde_json::json;
use tracing::debug;

use super::{Cli, Command};
use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::infrastructure::llm::ProviderRegistry;
use crate::infrastructure::logging::init_logging;

/// Load configuration, build the registry and run one subcommand
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let registry =
        ProviderRegistry::with_defaults(&config).context("Failed to build provider registry")?;
    let request = cli.request.to_request();
    debug!(
        api_keys = request.api_keys.len(),
        settings = request.provider_settings.len(),
        "Request assembled from arguments"
    );

    let output = match cli.command {
        Command::Providers => {
            let providers: Vec<_> = registry
                .backends()
                .iter()
                .map(|backend| {
                    let backend_config = backend.config();
                    json!({
                        "name": backend_config.name,
                        "apiKeyEnv": backend_config.api_token_env_key,
                        "baseUrlEnv": backend_config.base_url_env_key,
                        "apiKeyLink": backend_config.api_key_link,
                        "apiKeyLinkLabel": backend_config.api_key_link_label,
                        "staticModels": backend_config.static_models.len(),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&providers)?
        }
        Command::Models { backend } => {
            let models = registry.list_models(&backend, &request).await?;
            serde_json::to_string_pretty(&models)?
        }
        Command::AllModels => {
            let models = registry.list_all_models(&request).await;
            serde_json::to_string_pretty(&models)?
        }
        Command::Handle { backend, model } => {
            let handle = registry
                .create_model_handle(&backend, &model, &request)
                .map_err(|e| with_key_hint(&registry, &backend, e))?;
            serde_json::to_string_pretty(&handle)?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Point the user at the backend's key page for credential problems
fn with_key_hint(registry: &ProviderRegistry, backend: &str, error: DomainError) -> anyhow::Error {
    let link = registry
        .get(backend)
        .ok()
        .and_then(|b| b.config().api_key_link)
        .filter(|_| error.is_user_configuration());

    match link {
        Some(link) => anyhow::anyhow!("{} (get one at {})", error, link),
        None => error.into(),
    }
}
