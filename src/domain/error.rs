use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Missing credential for {provider}: {message}")]
    MissingCredential { provider: String, message: String },

    #[error("Invalid credential format for {provider}: {message}")]
    InvalidCredentialFormat { provider: String, message: String },

    #[error("Timed out after {timeout_ms}ms: {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Backend unreachable: {provider} - {message}")]
    BackendUnreachable { provider: String, message: String },

    #[error("Upstream HTTP error: {provider} returned {status} - {message}")]
    UpstreamHttp {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn missing_credential(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_credential_format(
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidCredentialFormat {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    pub fn backend_unreachable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendUnreachable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn upstream_http(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::UpstreamHttp {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether a catalog listing may absorb this error and fall back to the
    /// static catalog.
    pub fn is_recoverable_for_listing(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::BackendUnreachable { .. }
                | Self::UpstreamHttp { .. }
                | Self::Provider { .. }
                | Self::MissingCredential { .. }
                | Self::InvalidCredentialFormat { .. }
        )
    }

    /// Whether the error should be shown to the user as a configuration problem.
    pub fn is_user_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::InvalidCredentialFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Provider 'Foo' not found");
        assert_eq!(error.to_string(), "Not found: Provider 'Foo' not found");
    }

    #[test]
    fn test_missing_credential_error() {
        let error = DomainError::missing_credential("Deepseek", "no API key configured");
        assert_eq!(
            error.to_string(),
            "Missing credential for Deepseek: no API key configured"
        );
        assert!(error.is_user_configuration());
    }

    #[test]
    fn test_timeout_is_distinct_from_unreachable() {
        let timeout = DomainError::timeout("GET http://localhost:11434/api/tags", 5000);
        let unreachable = DomainError::backend_unreachable("Ollama", "connection refused");

        assert!(timeout.is_timeout());
        assert!(!unreachable.is_timeout());
        assert!(timeout.is_recoverable_for_listing());
        assert!(unreachable.is_recoverable_for_listing());
    }

    #[test]
    fn test_upstream_http_error_carries_status() {
        let error = DomainError::upstream_http("Moonshot", 500, "Internal Server Error");
        assert_eq!(
            error.to_string(),
            "Upstream HTTP error: Moonshot returned 500 - Internal Server Error"
        );
    }

    #[test]
    fn test_configuration_error_not_recoverable() {
        let error = DomainError::configuration("bad config");
        assert!(!error.is_recoverable_for_listing());
        assert!(!error.is_user_configuration());
    }
}
