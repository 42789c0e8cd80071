//! Base URL and credential resolution
//!
//! Resolution is a pure function of its inputs. Sources are consulted in
//! priority order and the first non-empty value wins:
//!
//! - base URL: provider settings, request env, process env, registry env,
//!   backend default
//! - API key: request `api_keys`, provider settings, request env, process env,
//!   registry env

use std::collections::HashMap;
use std::fmt;

use super::backend::BackendConfig;
use super::request::ProviderRequest;

/// Env key that flags a containerised deployment
pub const CONTAINER_ENV_KEY: &str = "RUNNING_IN_DOCKER";

/// Hostname that reaches the host machine from inside a container
pub const DEFAULT_CONTAINER_HOST_ALIAS: &str = "host.docker.internal";

/// Resolved base URL and credential for one call. Never persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Container network settings used by the locality rewriter
#[derive(Debug, Clone)]
pub struct ContainerSettings {
    pub running_in_container: bool,
    pub host_alias: String,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            running_in_container: false,
            host_alias: DEFAULT_CONTAINER_HOST_ALIAS.to_string(),
        }
    }
}

/// Process-wide resolution sources, passed explicitly instead of read globally
#[derive(Debug, Clone, Default)]
pub struct ResolverEnv {
    /// Snapshot of the process environment
    pub process_env: HashMap<String, String>,
    /// Registry-wide defaults from application configuration
    pub registry_env: HashMap<String, String>,
    pub container: ContainerSettings,
}

impl ResolverEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        Self {
            process_env: std::env::vars().collect(),
            ..Self::default()
        }
    }

    pub fn with_process_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.process_env.insert(key.into(), value.into());
        self
    }

    pub fn with_registry_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.registry_env.insert(key.into(), value.into());
        self
    }

    pub fn with_container(mut self, container: ContainerSettings) -> Self {
        self.container = container;
        self
    }

    /// Look up `key` in request env, then process env, then registry env
    pub fn lookup<'a>(
        &'a self,
        key: &str,
        server_env: &'a HashMap<String, String>,
    ) -> Option<&'a str> {
        [server_env, &self.process_env, &self.registry_env]
            .into_iter()
            .find_map(|env| non_empty(env.get(key).map(String::as_str)))
    }

    /// Whether loopback URLs must be rewritten for this request
    pub fn in_container(&self, server_env: &HashMap<String, String>) -> bool {
        self.container.running_in_container
            || server_env.get(CONTAINER_ENV_KEY).map(String::as_str) == Some("true")
            || self.process_env.get(CONTAINER_ENV_KEY).map(String::as_str) == Some("true")
    }
}

/// Resolve base URL and API key for `backend`. Never fails; absent values
/// are reported as `None`.
pub fn resolve_credential(
    backend: &BackendConfig,
    request: &ProviderRequest,
    env: &ResolverEnv,
) -> ResolvedCredential {
    let settings = request.settings_for(backend.name);
    let server_env = &request.server_env;

    let base_url = non_empty(settings.and_then(|s| s.base_url.as_deref()))
        .or_else(|| {
            backend
                .base_url_env_key
                .and_then(|key| env.lookup(key, server_env))
        })
        .or(backend.default_base_url)
        .map(strip_trailing_slash);

    let api_key = non_empty(request.api_key_for(backend.name))
        .or_else(|| non_empty(settings.and_then(|s| s.api_key.as_deref())))
        .or_else(|| {
            backend
                .api_token_env_key
                .and_then(|key| env.lookup(key, server_env))
        })
        .map(str::to_string);

    ResolvedCredential { base_url, api_key }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn strip_trailing_slash(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}
