//! Name-keyed dispatch over the registered backends

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::fireworks::FireworksBackend;
use super::hosted::HostedBackend;
use super::http_client::HttpClient;
use super::lmstudio::LmStudioBackend;
use super::ollama::OllamaBackend;
use super::timeout::TimeoutGuard;
use super::zai::ZaiBackend;
use crate::config::AppConfig;
use crate::domain::llm::validate_catalog;
use crate::domain::{
    DomainError, LlmBackend, ModelDescriptor, ModelHandle, ProviderRequest, ResolverEnv,
};

/// Backends in registration order plus the resolution sources shared by
/// every call
#[derive(Debug)]
pub struct ProviderRegistry {
    backends: Vec<Arc<dyn LlmBackend>>,
    env: ResolverEnv,
}

impl ProviderRegistry {
    pub fn new(env: ResolverEnv) -> Self {
        Self {
            backends: Vec::new(),
            env,
        }
    }

    /// Registry with the seven built-in backends, resolving against a
    /// snapshot of the current process environment
    pub fn with_defaults(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_defaults_from(config, ResolverEnv::from_process())
    }

    /// Same as `with_defaults` with an explicit process env snapshot
    pub fn with_defaults_from(config: &AppConfig, process: ResolverEnv) -> Result<Self, DomainError> {
        let env = ResolverEnv {
            registry_env: config.providers.env_vars(),
            container: config.locality.container_settings(),
            ..process
        };

        let client = HttpClient::with_request_timeout(config.catalog.fetch_timeout())?;
        let timeout = TimeoutGuard::new(config.catalog.fetch_timeout());

        let mut registry = Self::new(env);
        registry.register(Arc::new(OllamaBackend::new(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(LmStudioBackend::new(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(ZaiBackend::new(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(FireworksBackend::new(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(HostedBackend::moonshot(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(HostedBackend::deepseek(client.clone()).with_timeout(timeout)));
        registry.register(Arc::new(HostedBackend::cerebras(client).with_timeout(timeout)));

        info!(
            providers = registry.backends.len(),
            in_container = registry.env.container.running_in_container,
            "Provider registry initialized"
        );

        Ok(registry)
    }

    /// Add a backend. A backend with the same name is replaced in place.
    pub fn register(&mut self, backend: Arc<dyn LlmBackend>) {
        if let Err(e) = validate_catalog(backend.static_models(), backend.name()) {
            warn!(provider = backend.name(), error = %e, "Static catalog is inconsistent");
        }

        match self.backends.iter_mut().find(|b| b.name() == backend.name()) {
            Some(existing) => {
                debug!(provider = backend.name(), "Replacing registered backend");
                *existing = backend;
            }
            None => self.backends.push(backend),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn LlmBackend>, DomainError> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| DomainError::not_found(format!("Provider '{}' not found", name)))
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn backends(&self) -> &[Arc<dyn LlmBackend>] {
        &self.backends
    }

    pub async fn list_models(
        &self,
        name: &str,
        request: &ProviderRequest,
    ) -> Result<Vec<ModelDescriptor>, DomainError> {
        let backend = self.get(name)?;
        Ok(backend.list_models(request, &self.env).await)
    }

    pub fn create_model_handle(
        &self,
        name: &str,
        model: &str,
        request: &ProviderRequest,
    ) -> Result<ModelHandle, DomainError> {
        self.get(name)?.create_model_handle(model, request, &self.env)
    }

    /// Catalogs of every backend, fetched concurrently and concatenated in
    /// registration order
    pub async fn list_all_models(&self, request: &ProviderRequest) -> Vec<ModelDescriptor> {
        let catalogs = join_all(
            self.backends
                .iter()
                .map(|backend| backend.list_models(request, &self.env)),
        )
        .await;

        catalogs.into_iter().flatten().collect()
    }
}
