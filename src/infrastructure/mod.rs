//! Infrastructure layer - HTTP adapters, registry and logging

pub mod llm;
pub mod logging;
