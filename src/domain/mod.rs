//! Domain layer - Backend contract, model descriptors and catalog logic

pub mod catalog;
pub mod error;
pub mod llm;

pub use catalog::{CatalogCache, Fingerprint};
pub use error::DomainError;
pub use llm::{
    ApiFlavor, BackendConfig, LlmBackend, ModelDescriptor, ModelHandle, ProviderRequest,
    ProviderSettings, ResolvedCredential, ResolverEnv,
};
