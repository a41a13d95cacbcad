//! Inference backend implementations for Steward.
//!
//! All providers implement the `steward_core::Provider` trait.

pub mod ollama;

pub use ollama::OllamaProvider;

use std::sync::Arc;
use std::time::Duration;
use steward_config::AppConfig;
use steward_core::provider::Provider;

/// Build the configured provider.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    Arc::new(OllamaProvider::new(
        &config.ollama.base_url,
        Duration::from_secs(config.ollama.timeout_secs),
    ))
}
