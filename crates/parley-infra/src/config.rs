//! Global configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::Path;

use secrecy::SecretString;

use parley_core::prompt::template::PromptTemplate;
use parley_types::config::GlobalConfig;

/// Environment variable that overrides `api_key` from `config.toml`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config,
///   with a zero `request_timeout_secs` replaced by the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => sanitize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Replace values that would make every request fail with their defaults.
fn sanitize(mut config: GlobalConfig) -> GlobalConfig {
    if config.request_timeout_secs == 0 {
        let fallback = GlobalConfig::default().request_timeout_secs;
        tracing::warn!("request_timeout_secs must be at least 1, using {fallback}");
        config.request_timeout_secs = fallback;
    }
    config
}

/// Resolve the completion credential once at startup.
///
/// Priority:
/// 1. `OPENAI_API_KEY` environment variable (when non-empty)
/// 2. `api_key` from `config.toml`
pub fn resolve_api_key(config: &GlobalConfig) -> Option<SecretString> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), config)
}

fn resolve_api_key_from(env_value: Option<String>, config: &GlobalConfig) -> Option<SecretString> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.api_key.clone().filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
}

/// Load the persona template named by `template_path`, relative paths being
/// resolved against `data_dir`. Falls back to the built-in template when
/// unset or unreadable.
pub async fn load_template(config: &GlobalConfig, data_dir: &Path) -> PromptTemplate {
    let Some(template_path) = config.template_path.as_ref() else {
        return PromptTemplate::default();
    };

    let path = if template_path.is_absolute() {
        template_path.clone()
    } else {
        data_dir.join(template_path)
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => {
            tracing::debug!("Loaded persona template from {}", path.display());
            PromptTemplate::new(text)
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read template {}: {err}, using built-in template",
                path.display()
            );
            PromptTemplate::default()
        }
    }
}
