//! Cache fingerprints for dynamic catalogs

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;
use crate::domain::llm::{BackendConfig, ProviderRequest, ProviderSettings};

/// Digest of exactly the inputs that can change a backend's dynamic catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput<'a> {
    api_key: Option<&'a str>,
    provider_settings: Option<&'a ProviderSettings>,
    server_env: BTreeMap<&'a str, &'a str>,
}

impl Fingerprint {
    /// Only the backend's declared env keys take part, never the full env.
    pub fn compute(backend: &BackendConfig, request: &ProviderRequest) -> Result<Self, DomainError> {
        let server_env = backend
            .relevant_env_keys()
            .into_iter()
            .filter_map(|key| {
                request
                    .server_env
                    .get(key)
                    .filter(|value| !value.is_empty())
                    .map(|value| (key, value.as_str()))
            })
            .collect();

        let input = FingerprintInput {
            api_key: request.api_key_for(backend.name),
            provider_settings: request.settings_for(backend.name),
            server_env,
        };

        let json = serde_json::to_vec(&input).map_err(|e| {
            DomainError::internal(format!("Failed to serialize catalog fingerprint: {}", e))
        })?;

        Ok(Self(hex::encode(Sha256::digest(&json))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}
