//! Model handles consumed by the generation engine

use std::fmt;

use serde::Serialize;

/// Wire protocol the generation engine should speak for a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFlavor {
    /// OpenAI-compatible `/chat/completions`
    OpenAiCompatible,
    /// Ollama native API
    Ollama,
}

/// A backend-bound, ready-to-use reference to one model.
///
/// Building a handle performs no I/O; the generation engine connects lazily.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ModelHandle {
    provider: String,
    model: String,
    base_url: String,
    #[serde(skip_serializing)]
    credential: Option<String>,
    api: ApiFlavor,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
}

impl ModelHandle {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        api: ApiFlavor,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            base_url: base_url.into(),
            credential: None,
            api,
            num_ctx: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = Some(num_ctx);
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn api(&self) -> ApiFlavor {
        self.api
    }

    pub fn num_ctx(&self) -> Option<u32> {
        self.num_ctx
    }

    /// Value for the `Authorization` header, if the backend takes one
    pub fn authorization_header(&self) -> Option<String> {
        self.credential.as_ref().map(|c| format!("Bearer {}", c))
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("api", &self.api)
            .field("num_ctx", &self.num_ctx)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_hides_credential() {
        let handle = ModelHandle::new(
            "Moonshot",
            "kimi-latest",
            "https://api.moonshot.ai/v1",
            ApiFlavor::OpenAiCompatible,
        )
        .with_credential("sk-moon");

        assert!(!format!("{:?}", handle).contains("sk-moon"));

        let json = serde_json::to_value(&handle).unwrap();
        assert!(json.get("credential").is_none());
        assert_eq!(json["api"], "open_ai_compatible");
    }

    #[test]
    fn test_authorization_header() {
        let handle = ModelHandle::new("Cerebras", "llama3.1-8b", "u", ApiFlavor::OpenAiCompatible);
        assert_eq!(handle.authorization_header(), None);

        let handle = handle.with_credential("csk");
        assert_eq!(handle.authorization_header().as_deref(), Some("Bearer csk"));
    }
}
