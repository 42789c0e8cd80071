//! Model descriptor shared by every backend catalog

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single model offered by a backend.
///
/// Names are backend-native identifiers and are unique within one backend's
/// catalog. Descriptors are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    name: String,
    label: String,
    provider: String,
    max_input_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

impl ModelDescriptor {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        provider: impl Into<String>,
        max_input_tokens: u32,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            provider: provider.into(),
            max_input_tokens,
            max_completion_tokens: None,
        }
    }

    pub fn with_max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_completion_tokens);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn max_input_tokens(&self) -> u32 {
        self.max_input_tokens
    }

    pub fn max_completion_tokens(&self) -> Option<u32> {
        self.max_completion_tokens
    }
}

/// Descriptor validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorValidationError {
    /// Model name is empty
    EmptyName,
    /// Label is empty
    EmptyLabel { name: String },
    /// Descriptor belongs to another backend
    ProviderMismatch { name: String, expected: String, actual: String },
    /// Input token budget is zero
    ZeroInputTokens { name: String },
    /// Same name appears twice in one catalog
    DuplicateName { name: String },
}

impl fmt::Display for DescriptorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Model name cannot be empty"),
            Self::EmptyLabel { name } => write!(f, "Model '{}' has an empty label", name),
            Self::ProviderMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Model '{}' declares provider '{}' but belongs to '{}'",
                name, actual, expected
            ),
            Self::ZeroInputTokens { name } => {
                write!(f, "Model '{}' must allow at least one input token", name)
            }
            Self::DuplicateName { name } => {
                write!(f, "Model '{}' is declared more than once", name)
            }
        }
    }
}

impl std::error::Error for DescriptorValidationError {}

/// Validate one descriptor against the backend it is declared for
pub fn validate_descriptor(
    descriptor: &ModelDescriptor,
    provider: &str,
) -> Result<(), DescriptorValidationError> {
    if descriptor.name.is_empty() {
        return Err(DescriptorValidationError::EmptyName);
    }

    if descriptor.label.is_empty() {
        return Err(DescriptorValidationError::EmptyLabel {
            name: descriptor.name.clone(),
        });
    }

    if descriptor.provider != provider {
        return Err(DescriptorValidationError::ProviderMismatch {
            name: descriptor.name.clone(),
            expected: provider.to_string(),
            actual: descriptor.provider.clone(),
        });
    }

    if descriptor.max_input_tokens == 0 {
        return Err(DescriptorValidationError::ZeroInputTokens {
            name: descriptor.name.clone(),
        });
    }

    Ok(())
}

/// Validate a whole catalog: every descriptor and name uniqueness
pub fn validate_catalog(
    models: &[ModelDescriptor],
    provider: &str,
) -> Result<(), DescriptorValidationError> {
    let mut seen = std::collections::HashSet::new();

    for model in models {
        validate_descriptor(model, provider)?;

        if !seen.insert(model.name()) {
            return Err(DescriptorValidationError::DuplicateName {
                name: model.name.clone(),
            });
        }
    }

    Ok(())
}
