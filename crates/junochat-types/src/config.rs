//! Global configuration types for JunoChat.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! reply-generation endpoint and request timeouts.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the JunoChat server.
///
/// Loaded from `~/.junochat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings for the external reply-generation service.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
        }
    }
}

/// Connection settings for the reply-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the generation service (e.g., "http://localhost:5000").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How long to wait for a generated reply before degrading to the
    /// fallback reply, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
