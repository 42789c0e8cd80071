//! LLM backend adapters, their HTTP plumbing and the provider registry

mod cerebras;
mod deepseek;
mod fireworks;
mod hosted;
mod http_client;
mod listing;
mod lmstudio;
mod locality;
mod moonshot;
mod ollama;
mod registry;
mod signer;
mod timeout;
mod zai;

pub use fireworks::FireworksBackend;
pub use hosted::{HostedBackend, HostedProfile};
pub use http_client::{HttpClient, HttpClientTrait};
pub use lmstudio::LmStudioBackend;
pub use locality::LocalityRewriter;
pub use ollama::OllamaBackend;
pub use registry::ProviderRegistry;
pub use signer::{CredentialSigner, TOKEN_TTL_MS, is_valid_token};
pub use timeout::{CATALOG_FETCH_TIMEOUT, EXTERNAL_FETCH_TIMEOUT, TimeoutGuard};
pub use zai::ZaiBackend;

