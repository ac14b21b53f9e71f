//! Configuration loader for JunoChat.
//!
//! Reads `config.toml` from the data directory (`~/.junochat/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use junochat_types::config::AppConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `JUNOCHAT_DATA_DIR` environment variable
/// 2. Platform-specific home directory (`~/.junochat`)
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("JUNOCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".junochat");
    }

    // Last resort: current directory
    PathBuf::from(".junochat")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.generator.base_url, "http://localhost:5000");
        assert_eq!(config.generator.timeout_secs, 60);
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[generator]
base_url = "http://gen.internal:8080"
timeout_secs = 30
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.generator.base_url, "http://gen.internal:8080");
        assert_eq!(config.generator.timeout_secs, 30);
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.generator.base_url, "http://localhost:5000");
    }

    #[test]
    fn resolve_data_dir_honors_env_override() {
        match std::env::var("JUNOCHAT_DATA_DIR") {
            Ok(dir) => assert_eq!(resolve_data_dir(), PathBuf::from(dir)),
            Err(_) => assert!(resolve_data_dir().ends_with(".junochat")),
        }
    }
}
