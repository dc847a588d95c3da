use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CompassError, Result};

/// Top-level configuration for the Compass application.
///
/// Loaded from `~/.compass/config.toml` by default. Each section corresponds
/// to a subsystem or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompassConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl CompassConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CompassConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CompassError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite session database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.compass/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// External inference service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the converse endpoint.
    pub endpoint: String,
    /// Model identifier sent with each request.
    pub model_id: String,
    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    pub api_key_env: String,
    /// Maximum tokens per model response.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling parameter.
    pub top_p: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures before the turn degrades.
    pub max_retries: u32,
    /// Initial backoff between retries; doubles per attempt.
    pub retry_backoff_ms: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            model_id: "us.amazon.nova-lite-v1:0".to_string(),
            api_key_env: "COMPASS_API_KEY".to_string(),
            max_tokens: 2048,
            temperature: 0.4,
            top_p: 0.9,
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 250,
        }
    }
}

/// Conversation agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Hard cap on inference round-trips per turn.
    pub max_tool_rounds: u32,
    /// Turns of transcript retained for display. Structured session state
    /// (profile, results, resources, plan) is never truncated.
    pub transcript_retain: usize,
    /// Maximum user message length in characters.
    pub max_message_length: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            transcript_retain: 200,
            max_message_length: 4000,
        }
    }
}

/// Eligibility engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of the near-threshold band, in percentage points of the
    /// governing threshold. Incomes inside the band report Medium rather
    /// than High.
    pub near_margin_pct: f64,
    /// Vintage year of the reference tables to evaluate against.
    pub reference_year: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_margin_pct: 10.0,
            reference_year: 2024,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind on 127.0.0.1.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3030 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompassConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.agent.max_tool_rounds, 8);
        assert_eq!(config.engine.near_margin_pct, 10.0);
        assert_eq!(config.engine.reference_year, 2024);
        assert_eq!(config.server.port, 3030);
    }

    #[test]
    fn test_inference_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.api_key_env, "COMPASS_API_KEY");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.max_retries, 2);
        assert!(config.timeout_secs > 0);
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = CompassConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: CompassConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.inference.model_id, config.inference.model_id);
        assert_eq!(parsed.agent.transcript_retain, config.agent.transcript_retain);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [server]
            port = 8080
        "#;
        let config: CompassConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.agent.max_tool_rounds, 8);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: CompassConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.inference.model_id, "us.amazon.nova-lite-v1:0");
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = CompassConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.server.port, 3030);
    }

    #[test]
    fn test_load_invalid_toml_falls_back() {
        let dir = std::env::temp_dir().join("compass-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let config = CompassConfig::load_or_default(&path);
        assert_eq!(config.server.port, 3030);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join("compass-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("saved.toml");

        let mut config = CompassConfig::default();
        config.server.port = 4040;
        config.agent.max_tool_rounds = 5;
        config.save(&path).unwrap();

        let reloaded = CompassConfig::load(&path).unwrap();
        assert_eq!(reloaded.server.port, 4040);
        assert_eq!(reloaded.agent.max_tool_rounds, 5);
        let _ = std::fs::remove_file(&path);
    }
}
