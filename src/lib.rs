//! LLM Catalog
//!
//! One contract over heterogeneous LLM backends (hosted APIs and local
//! inference servers) for:
//! - Resolving base URLs and credentials from request, process and config
//! - Listing static + live model catalogs, cached per input fingerprint
//! - Building authenticated model handles, including signed Z.ai tokens

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, LlmBackend, ModelDescriptor, ModelHandle, ProviderRequest};
pub use infrastructure::llm::ProviderRegistry;
