//! Configuration handling for the client

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment override for the REST base URL
pub const API_URL_ENV: &str = "SHOWCASE_API_URL";
/// Environment override for the hostname used in base URL selection
pub const HOST_ENV: &str = "SHOWCASE_HOST";

const DEFAULT_HOST: &str = "localhost";

/// Platform directories for config, data and logs
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("ru", "emiit", "showcase-tui")
}

/// User configuration for the client
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit REST base URL, skips host-based selection
    pub api_url: Option<String>,
    /// Hostname the client pretends to be served from
    pub host: Option<String>,
    /// Require each wizard step to be valid before advancing
    #[serde(default)]
    pub strict_wizard: bool,
    /// tracing filter directive, e.g. "showcase_tui=debug"
    pub log_filter: Option<String>,
}

impl ClientConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ClientConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Whether a config file has been written yet
    pub fn exists() -> bool {
        Self::config_path().is_some_and(|p| p.exists())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Base URL of the REST backend, honouring environment overrides
    pub fn api_base_url(&self) -> String {
        self.api_base_url_with(std::env::var(API_URL_ENV).ok(), std::env::var(HOST_ENV).ok())
    }

    fn api_base_url_with(&self, env_url: Option<String>, env_host: Option<String>) -> String {
        if let Some(url) = env_url.or_else(|| self.api_url.clone()) {
            return url.trim_end_matches('/').to_string();
        }
        let host = env_host
            .or_else(|| self.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        resolve_api_url(&host).to_string()
    }
}

/// Select the backend for the hostname the client is served from
pub fn resolve_api_url(host: &str) -> &'static str {
    match host {
        "localhost" => "http://10.242.221.0:8000/api",
        "cvo-test.emiit.ru" => "https://cvo-test-api.emiit.ru/api/v1",
        "cvo.emiit.ru" => "https://cvo-api.emiit.ru/api/v1",
        _ => "http://10.242.224.105:8000/api/v1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.api_url.is_none());
        assert!(config.host.is_none());
        assert!(!config.strict_wizard);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_resolve_known_hosts() {
        assert_eq!(resolve_api_url("localhost"), "http://10.242.221.0:8000/api");
        assert_eq!(
            resolve_api_url("cvo-test.emiit.ru"),
            "https://cvo-test-api.emiit.ru/api/v1"
        );
        assert_eq!(
            resolve_api_url("cvo.emiit.ru"),
            "https://cvo-api.emiit.ru/api/v1"
        );
    }

    #[test]
    fn test_resolve_unknown_host_uses_fallback() {
        assert_eq!(
            resolve_api_url("example.org"),
            "http://10.242.224.105:8000/api/v1"
        );
    }

    #[test]
    fn test_base_url_precedence() {
        let config = ClientConfig {
            api_url: Some("http://config/api/".to_string()),
            host: Some("cvo.emiit.ru".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.api_base_url_with(Some("http://env/api".into()), None),
            "http://env/api"
        );
        assert_eq!(config.api_base_url_with(None, None), "http://config/api");

        let by_host = ClientConfig {
            host: Some("cvo.emiit.ru".to_string()),
            ..Default::default()
        };
        assert_eq!(
            by_host.api_base_url_with(None, None),
            "https://cvo-api.emiit.ru/api/v1"
        );
        assert_eq!(
            by_host.api_base_url_with(None, Some("cvo-test.emiit.ru".into())),
            "https://cvo-test-api.emiit.ru/api/v1"
        );
        assert_eq!(
            ClientConfig::default().api_base_url_with(None, None),
            "http://10.242.221.0:8000/api"
        );
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ClientConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"strict_wizard": true, "unknown_field": "value"}"#;
        let parsed: ClientConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.strict_wizard);
    }

    #[test]
    fn test_load_returns_ok() {
        assert!(ClientConfig::load().is_ok());
    }
}
