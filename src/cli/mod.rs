//! CLI for inspecting provider catalogs
//!
//! Subcommands:
//! - `providers`: registered backends and where to get their keys
//! - `models`: merged catalog of one backend
//! - `all-models`: merged catalogs of every backend
//! - `handle`: the model handle a backend would produce

pub mod catalog;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ProviderRequest, ProviderSettings};

/// LLM Catalog - Model catalogs and handles across LLM backends
#[derive(Parser)]
#[command(name = "llm-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered backends
    Providers,

    /// Print the merged catalog of one backend as JSON
    Models {
        /// Backend display name, e.g. "Deepseek"
        backend: String,
    },

    /// Print the merged catalogs of every backend as JSON
    AllModels,

    /// Print the handle for a model, credential redacted
    Handle {
        backend: String,
        model: String,
    },
}

/// Per-request credentials and settings
#[derive(Args, Debug, Default)]
pub struct RequestArgs {
    /// API key for a backend, as NAME=KEY (repeatable)
    #[arg(long = "api-key", value_name = "NAME=KEY", value_parser = parse_key_value, global = true)]
    pub api_keys: Vec<(String, String)>,

    /// Base URL override for a backend, as NAME=URL (repeatable)
    #[arg(long = "base-url", value_name = "NAME=URL", value_parser = parse_key_value, global = true)]
    pub base_urls: Vec<(String, String)>,

    /// Request-scoped environment variable, as KEY=VALUE (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
    pub env: Vec<(String, String)>,
}

impl RequestArgs {
    pub fn to_request(&self) -> ProviderRequest {
        let mut request = ProviderRequest::new();

        for (name, key) in &self.api_keys {
            request = request.with_api_key(name, key);
        }
        for (name, url) in &self.base_urls {
            let settings = request
                .settings_for(name)
                .cloned()
                .unwrap_or_default()
                .with_base_url(url);
            request = request.with_settings(name, settings);
        }
        for (key, value) in &self.env {
            request = request.with_env(key, value);
        }

        request
    }
}

/// Split `NAME=VALUE` at the first `=`
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}
