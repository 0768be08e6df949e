/// Client configuration
use crate::error::{CliError, Result};
use nghe_client::ClientConfig;
use nghe_playback::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "nghe.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `nghe.toml` is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn from_sources(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. NGHE_API__BASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("NGHE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            CliError::Config(format!("Invalid API base URL '{}': {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::Config(format!(
                "API base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.api.page_size == 0 {
            return Err(CliError::Config(
                "Page size must be at least 1 (set NGHE_API__PAGE_SIZE)".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(CliError::Config("Request timeout must be positive".to_string()));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
            page_size: self.api.page_size,
        }
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            poll_interval: Duration::from_millis(self.player.poll_interval_ms),
            ..CoordinatorConfig::default()
        }
    }

    pub fn session_load_timeout(&self) -> Duration {
        Duration::from_millis(self.session.load_timeout_ms)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
        page_size: default_page_size(),
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    nghe_client::DEFAULT_PAGE_SIZE
}

fn default_session() -> SessionSettings {
    SessionSettings {
        token_path: default_token_path(),
        load_timeout_ms: default_load_timeout_ms(),
    }
}

fn default_token_path() -> PathBuf {
    PathBuf::from("./data/session.json")
}

fn default_load_timeout_ms() -> u64 {
    2000
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        poll_interval_ms: default_poll_interval_ms(),
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            session: default_session(),
            player: default_player(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::from_sources(Some(&path), env(&[])).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.api.page_size, 20);
        assert_eq!(config.session.token_path, PathBuf::from("./data/session.json"));
        assert_eq!(config.session_load_timeout(), Duration::from_secs(2));
        config.validate().unwrap();
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nghe.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://music.example.com\"\npage_size = 50\n\n[player]\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let config = AppConfig::from_sources(Some(&path), env(&[])).unwrap();
        assert_eq!(config.api.base_url, "https://music.example.com");
        assert_eq!(config.client_config().page_size, 50);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.coordinator_config().poll_interval,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nghe.toml");
        std::fs::write(&path, "[api]\npage_size = 50\n").unwrap();

        let config = AppConfig::from_sources(
            Some(&path),
            env(&[
                ("NGHE_API__PAGE_SIZE", "10"),
                ("NGHE_SESSION__TOKEN_PATH", "/tmp/nghe/session.json"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api.page_size, 10);
        assert_eq!(
            config.session.token_path,
            PathBuf::from("/tmp/nghe/session.json")
        );
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::from_sources(Some(&dir.path().join("nope.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://music.example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn renders_as_toml() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("base_url = \"http://127.0.0.1:8080\""));
        assert!(rendered.contains("[player]"));
        assert!(!rendered.contains("[search]"));
    }
}
