//! Static, per-backend configuration

use super::descriptor::ModelDescriptor;

/// Static data describing one backend. Built once at adapter construction
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Display name, also the key into `api_keys` and `provider_settings`
    pub name: &'static str,
    pub base_url_env_key: Option<&'static str>,
    pub api_token_env_key: Option<&'static str>,
    pub default_base_url: Option<&'static str>,
    /// Additional environment keys that change the dynamic catalog
    pub extra_env_keys: Vec<&'static str>,
    pub static_models: Vec<ModelDescriptor>,
    pub api_key_link: Option<&'static str>,
    pub api_key_link_label: Option<&'static str>,
}

impl BackendConfig {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            base_url_env_key: None,
            api_token_env_key: None,
            default_base_url: None,
            extra_env_keys: Vec::new(),
            static_models: Vec::new(),
            api_key_link: None,
            api_key_link_label: None,
        }
    }

    pub fn with_base_url_env_key(mut self, key: &'static str) -> Self {
        self.base_url_env_key = Some(key);
        self
    }

    pub fn with_api_token_env_key(mut self, key: &'static str) -> Self {
        self.api_token_env_key = Some(key);
        self
    }

    pub fn with_default_base_url(mut self, url: &'static str) -> Self {
        self.default_base_url = Some(url);
        self
    }

    pub fn with_extra_env_key(mut self, key: &'static str) -> Self {
        self.extra_env_keys.push(key);
        self
    }

    pub fn with_static_model(mut self, model: ModelDescriptor) -> Self {
        self.static_models.push(model);
        self
    }

    pub fn with_api_key_link(mut self, link: &'static str) -> Self {
        self.api_key_link = Some(link);
        self
    }

    pub fn with_api_key_link_label(mut self, label: &'static str) -> Self {
        self.api_key_link_label = Some(label);
        self
    }

    /// Shorthand for a static model owned by this backend
    pub fn model(&self, name: &str, label: &str, max_input_tokens: u32) -> ModelDescriptor {
        ModelDescriptor::new(name, label, self.name, max_input_tokens)
    }

    /// Environment keys whose values can change this backend's dynamic catalog
    pub fn relevant_env_keys(&self) -> Vec<&'static str> {
        self.base_url_env_key
            .into_iter()
            .chain(self.api_token_env_key)
            .chain(self.extra_env_keys.iter().copied())
            .collect()
    }

    pub fn is_static_model(&self, name: &str) -> bool {
        self.static_models.iter().any(|m| m.name() == name)
    }
}
