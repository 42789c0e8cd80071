//! Per-request inputs: API keys, provider settings and request-scoped env

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-backend settings supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Free-form flags kept for fingerprinting; ordered for determinism
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub flags: std::collections::BTreeMap<String, serde_json::Value>,
}

impl ProviderSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.flags.insert(key.into(), value);
        self
    }
}

/// Everything a caller passes when asking for a catalog or a model handle
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    /// Backend display name -> bare secret
    pub api_keys: HashMap<String, String>,
    /// Backend display name -> settings
    pub provider_settings: HashMap<String, ProviderSettings>,
    /// Environment supplied by the hosting runtime for this request
    pub server_env: HashMap<String, String>,
}

impl ProviderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    pub fn with_settings(mut self, provider: impl Into<String>, settings: ProviderSettings) -> Self {
        self.provider_settings.insert(provider.into(), settings);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_env.insert(key.into(), value.into());
        self
    }

    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    pub fn settings_for(&self, provider: &str) -> Option<&ProviderSettings> {
        self.provider_settings.get(provider)
    }
}
