use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::llm::{ContainerSettings, DEFAULT_CONTAINER_HOST_ALIAS};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub locality: LocalityConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Deadlines for outbound catalog calls
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_external_fetch_timeout_ms")]
    pub external_fetch_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalityConfig {
    #[serde(default)]
    pub running_in_container: bool,
    #[serde(default = "default_host_alias")]
    pub host_alias: String,
}

/// Registry-wide fallbacks, consulted after the request and process env
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub env: HashMap<String, String>,
}

fn default_fetch_timeout_ms() -> u64 {
    5000
}

fn default_external_fetch_timeout_ms() -> u64 {
    10000
}

fn default_host_alias() -> String {
    DEFAULT_CONTAINER_HOST_ALIAS.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            external_fetch_timeout_ms: default_external_fetch_timeout_ms(),
        }
    }
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self {
            running_in_container: false,
            host_alias: default_host_alias(),
        }
    }
}

impl CatalogConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn external_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.external_fetch_timeout_ms)
    }
}

impl ProvidersConfig {
    /// Registry env with upper-cased keys. Config sources lowercase map keys
    /// while env var names are looked up verbatim.
    pub fn env_vars(&self) -> HashMap<String, String> {
        self.env
            .iter()
            .map(|(key, value)| (key.to_ascii_uppercase(), value.clone()))
            .collect()
    }
}

impl LocalityConfig {
    pub fn container_settings(&self) -> ContainerSettings {
        ContainerSettings {
            running_in_container: self.running_in_container,
            host_alias: self.host_alias.clone(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(value: serde_json::Value) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(
                &value.to_string(),
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.catalog.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.catalog.external_fetch_timeout(), Duration::from_secs(10));
        assert!(!config.locality.running_in_container);
        assert_eq!(config.locality.host_alias, "host.docker.internal");
        assert!(config.providers.env.is_empty());
    }

    #[test]
    fn test_provider_env_keys_are_upper_cased() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[providers.env]\nCEREBRAS_API_KEY = \"csk-from-config\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let env = config.providers.env_vars();
        assert_eq!(env.get("CEREBRAS_API_KEY").map(String::as_str), Some("csk-from-config"));
        assert!(!env.contains_key("cerebras_api_key"));
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config = from_json(serde_json::json!({
            "logging": {"level": "debug", "format": "json"},
            "locality": {"running_in_container": true},
            "providers": {"env": {"OLLAMA_API_BASE_URL": "http://localhost:11434"}}
        }));

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.catalog.fetch_timeout_ms, 5000);
        assert_eq!(config.locality.host_alias, "host.docker.internal");
        assert!(config.locality.container_settings().running_in_container);
        assert_eq!(
            config.providers.env_vars().get("OLLAMA_API_BASE_URL").map(String::as_str),
            Some("http://localhost:11434")
        );
    }
}
