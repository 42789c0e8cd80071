//! LLM backend domain models and the shared backend contract

mod backend;
mod credential;
mod descriptor;
mod handle;
mod provider;
mod request;

pub use backend::BackendConfig;
pub use credential::{
    CONTAINER_ENV_KEY, ContainerSettings, DEFAULT_CONTAINER_HOST_ALIAS, ResolvedCredential,
    ResolverEnv, resolve_credential,
};
pub use descriptor::{
    DescriptorValidationError, ModelDescriptor, validate_catalog, validate_descriptor,
};
pub use handle::{ApiFlavor, ModelHandle};
pub use provider::LlmBackend;
pub use request::{ProviderRequest, ProviderSettings};

#[cfg(test)]
pub use provider::mock::MockBackend;
