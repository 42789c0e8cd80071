//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CatalogConfig, LocalityConfig, LogFormat, LoggingConfig, ProvidersConfig,
};
