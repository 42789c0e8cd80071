use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, error, warn};

use super::backend::BackendConfig;
use super::credential::{ResolvedCredential, ResolverEnv, resolve_credential};
use super::descriptor::ModelDescriptor;
use super::handle::ModelHandle;
use super::request::ProviderRequest;
use crate::domain::DomainError;
use crate::domain::catalog::{CatalogCache, Fingerprint, exclude_static, merge_catalog};

/// Contract shared by every LLM backend adapter (Ollama, Deepseek, etc.)
#[async_trait]
pub trait LlmBackend: Send + Sync + Debug {
    /// Static configuration of this backend
    fn config(&self) -> &BackendConfig;

    /// Per-instance dynamic catalog cache
    fn catalog_cache(&self) -> &CatalogCache;

    /// Display name of the backend
    fn name(&self) -> &'static str {
        self.config().name
    }

    /// Build-time catalog, always part of `list_models`
    fn static_models(&self) -> &[ModelDescriptor] {
        &self.config().static_models
    }

    /// Resolve base URL and credential. Pure, never performs I/O.
    fn resolve_credential(&self, request: &ProviderRequest, env: &ResolverEnv) -> ResolvedCredential {
        resolve_credential(self.config(), request, env)
    }

    /// Query the backend's live listing endpoint.
    ///
    /// Backends without a listing endpoint keep the empty default. Results
    /// must already exclude static names.
    async fn fetch_dynamic_models(
        &self,
        _request: &ProviderRequest,
        _env: &ResolverEnv,
    ) -> Result<Vec<ModelDescriptor>, DomainError> {
        Ok(Vec::new())
    }

    /// Build a handle for `model`. Fails when a mandatory key or base URL
    /// cannot be resolved.
    fn create_model_handle(
        &self,
        model: &str,
        request: &ProviderRequest,
        env: &ResolverEnv,
    ) -> Result<ModelHandle, DomainError>;

    /// Merged static + dynamic catalog. Never fails: fetch errors degrade to
    /// the static catalog for this call only.
    async fn list_models(&self, request: &ProviderRequest, env: &ResolverEnv) -> Vec<ModelDescriptor> {
        let config = self.config();

        let fingerprint = match Fingerprint::compute(config, request) {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                warn!(provider = config.name, error = %e, "Catalog fingerprint unavailable, cache bypassed");
                None
            }
        };

        if let Some(ref fingerprint) = fingerprint {
            if let Some(cached) = self.catalog_cache().get(fingerprint).await {
                debug!(provider = config.name, %fingerprint, "Catalog cache hit");
                return merge_catalog(&config.static_models, cached);
            }
            debug!(provider = config.name, %fingerprint, "Catalog cache miss");
        }

        match self.fetch_dynamic_models(request, env).await {
            Ok(dynamic) => {
                let dynamic = exclude_static(&config.static_models, dynamic);

                if let Some(fingerprint) = fingerprint {
                    self.catalog_cache().put(fingerprint, dynamic.clone()).await;
                }

                merge_catalog(&config.static_models, dynamic)
            }
            Err(e) if e.is_timeout() => {
                warn!(provider = config.name, error = %e, "Model listing timed out, is the backend running?");
                config.static_models.clone()
            }
            Err(e) if e.is_recoverable_for_listing() => {
                warn!(provider = config.name, error = %e, "Failed to fetch dynamic models");
                config.static_models.clone()
            }
            Err(e) => {
                error!(provider = config.name, error = %e, "Unexpected error fetching dynamic models");
                config.static_models.clone()
            }
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::ApiFlavor;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub struct MockBackend {
        config: BackendConfig,
        cache: CatalogCache,
        dynamic: Mutex<Result<Vec<ModelDescriptor>, String>>,
        fetch_count: AtomicUsize,
    }

    impl MockBackend {
        pub fn new(name: &'static str) -> Self {
            let config = BackendConfig::new(name)
                .with_api_token_env_key("MOCK_API_KEY")
                .with_default_base_url("http://mock.local/");
            let static_model = config.model("static-model", "Static Model", 8000);

            Self {
                config: config.with_static_model(static_model),
                cache: CatalogCache::new(),
                dynamic: Mutex::new(Ok(Vec::new())),
                fetch_count: AtomicUsize::new(0),
            }
        }

        pub fn with_dynamic(self, names: &[&str]) -> Self {
            let models = names
                .iter()
                .map(|n| ModelDescriptor::new(*n, *n, self.config.name, 8000))
                .collect();
            *self.dynamic.lock().unwrap() = Ok(models);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.dynamic.lock().unwrap() = Err(error.into());
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmBackend for MockBackend {
        fn config(&self) -> &BackendConfig {
            &self.config
        }

        fn catalog_cache(&self) -> &CatalogCache {
            &self.cache
        }

        async fn fetch_dynamic_models(
            &self,
            _request: &ProviderRequest,
            _env: &ResolverEnv,
        ) -> Result<Vec<ModelDescriptor>, DomainError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.dynamic
                .lock()
                .unwrap()
                .clone()
                .map_err(|e| DomainError::backend_unreachable(self.config.name, e))
        }

        fn create_model_handle(
            &self,
            model: &str,
            request: &ProviderRequest,
            env: &ResolverEnv,
        ) -> Result<ModelHandle, DomainError> {
            let resolved = self.resolve_credential(request, env);
            let api_key = resolved
                .api_key
                .ok_or_else(|| DomainError::missing_credential(self.config.name, "no API key"))?;
            let base_url = resolved.base_url.unwrap_or_default();

            Ok(ModelHandle::new(self.config.name, model, base_url, ApiFlavor::OpenAiCompatible)
                .with_credential(api_key))
        }
    }
}
