//! Signed bearer tokens for backends that reject bare API keys
//!
//! The API key is a compound `id.secret`. Tokens are JWT-shaped: a
//! base64url header and payload signed with HMAC-SHA256 keyed by `secret`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::domain::DomainError;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime in milliseconds
pub const TOKEN_TTL_MS: i64 = 3600 * 1000;

#[derive(Debug, Serialize)]
struct TokenHeader {
    alg: &'static str,
    sign_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims<'a> {
    api_key: &'a str,
    exp: i64,
    timestamp: i64,
}

/// Generates a fresh token on every call; tokens are never cached.
#[derive(Debug, Clone)]
pub struct CredentialSigner {
    provider: &'static str,
}

impl CredentialSigner {
    pub fn new(provider: &'static str) -> Self {
        Self { provider }
    }

    pub fn generate_token(&self, api_key: &str) -> Result<String, DomainError> {
        self.generate_token_at(api_key, Utc::now().timestamp_millis())
    }

    /// Sign with an explicit clock, `now_ms` in Unix milliseconds
    pub fn generate_token_at(&self, api_key: &str, now_ms: i64) -> Result<String, DomainError> {
        let (id, secret) = self.split_key(api_key)?;

        let header = encode_segment(&TokenHeader {
            alg: "HS256",
            sign_type: "SIGN",
        })?;
        let claims = encode_segment(&TokenClaims {
            api_key: id,
            exp: now_ms + TOKEN_TTL_MS,
            timestamp: now_ms,
        })?;

        let signing_input = format!("{}.{}", header, claims);
        let signature = sign(secret, &signing_input)?;

        Ok(format!("{}.{}", signing_input, signature))
    }

    fn split_key<'a>(&self, api_key: &'a str) -> Result<(&'a str, &'a str), DomainError> {
        let mut parts = api_key.split('.');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(secret), None) if !id.is_empty() && !secret.is_empty() => {
                Ok((id, secret))
            }
            _ => Err(DomainError::invalid_credential_format(
                self.provider,
                "expected an API key of the form id.secret",
            )),
        }
    }
}

/// Structural check only: three non-empty dot-separated segments
pub fn is_valid_token(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|part| !part.is_empty())
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, DomainError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| DomainError::internal(format!("Failed to encode token segment: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn sign(secret: &str, input: &str) -> Result<String, DomainError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| DomainError::internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}
