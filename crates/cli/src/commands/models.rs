//! `steward models`: list models available on the backend.

use steward_config::AppConfig;
use steward_core::provider::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let provider = steward_providers::build_from_config(&config);

    let models = provider
        .list_models()
        .await
        .map_err(|e| format!("Failed to list models from {}: {e}", config.ollama.base_url))?;

    if models.is_empty() {
        println!("No models found. Pull one with `ollama pull <model>`.");
        return Ok(());
    }

    for name in &models {
        let marker = if config.default_model.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}");
    }
    Ok(())
}
