//! `steward doctor`: diagnose config and backend health.

use steward_config::AppConfig;
use steward_core::provider::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Steward Doctor");
    println!("==============\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  [ok]   Config file found at {}", config_path.display());
    } else {
        println!(
            "  [info] No config file at {}; using defaults",
            config_path.display()
        );
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Configuration valid");
            config
        }
        Err(e) => {
            println!("  [fail] Configuration invalid: {e}");
            println!("\n  1 issue found. Fix the config before running other checks.");
            return Ok(());
        }
    };

    let provider = steward_providers::build_from_config(&config);
    match provider.health_check().await {
        Ok(true) => println!("  [ok]   Backend reachable at {}", config.ollama.base_url),
        Ok(false) | Err(_) => {
            println!(
                "  [fail] Backend not reachable at {} (is `ollama serve` running?)",
                config.ollama.base_url
            );
            issues += 1;
        }
    }

    match provider.list_models().await {
        Ok(models) if models.is_empty() => {
            println!("  [warn] No models installed; run `ollama pull <model>`");
            issues += 1;
        }
        Ok(models) => {
            println!("  [ok]   {} model(s) available", models.len());
            if let Some(model) = &config.default_model {
                if models.iter().any(|m| m == model) {
                    println!("  [ok]   Default model '{model}' is installed");
                } else {
                    println!("  [warn] Default model '{model}' is not installed");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  [fail] Could not list models: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
