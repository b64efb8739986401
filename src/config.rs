use crate::platform::{Platform, StaticPlatformRegistry};
use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Default upstream host template; `{platform}` expands to the lowercase tag
pub const DEFAULT_UPSTREAM_URL: &str = "https://{platform}.api.riotgames.com";

#[derive(Debug, Clone, Serialize)]
pub struct MatchgateConfig {
    /// Platform used when a request carries no `platform` parameter
    pub default_platform: Option<Platform>,

    /// API key sent to the upstream API
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Upstream host template
    pub upstream_url: String,

    /// Upstream request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Address the HTTP server binds to
    pub address: String,

    /// Port the HTTP server listens on
    pub port: u16,
}

const EMPTY_CONFIG: &str = r#"### matchgate configuration file

### platform used when a request has no `platform` parameter (e.g. "NA1")
# default_platform = "NA1"

### upstream API key (prefer MATCHGATE_API_KEY in the environment)
# api_key = ""

### upstream host template, {platform} expands to the lowercase platform tag
# upstream_url = "https://{platform}.api.riotgames.com"
# request_timeout_secs = 10

### HTTP server
# address = "127.0.0.1"
# port = 8080
"#;

impl Default for MatchgateConfig {
    fn default() -> Self {
        Self {
            default_platform: None,
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            request_timeout_secs: 10,
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl MatchgateConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<MatchgateConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.matchgate/matchgate.toml as the configuration file path
                let matchgate_dir = Self::config_dir()?;
                std::fs::create_dir_all(matchgate_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create matchgate directory: {}", e))?;
                let p = format!("{}/matchgate.toml", matchgate_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of MATCHGATE)
        // E.g., `MATCHGATE_DEFAULT_PLATFORM=NA1 ./matchgate serve` sets the default platform
        builder = builder.add_source(config::Environment::with_prefix("MATCHGATE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    /// Build a configuration from flat key/value settings
    pub fn from_map(config: &HashMap<String, String>) -> Result<MatchgateConfig> {
        let defaults = MatchgateConfig::default();

        let default_platform = match config.get("default_platform").map(|s| s.trim()) {
            Some(tag) if !tag.is_empty() => Some(
                tag.parse::<Platform>()
                    .map_err(|e| anyhow!("Invalid default_platform: {}", e))?,
            ),
            _ => None,
        };

        let api_key = config
            .get("api_key")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let upstream_url = config
            .get("upstream_url")
            .cloned()
            .unwrap_or(defaults.upstream_url);

        // Parse upstream timeout (default: 10 seconds); zero would fail every request
        let request_timeout_secs = match config.get("request_timeout_secs") {
            Some(t) => match t.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(anyhow!(
                        "Invalid request_timeout_secs '{}': must be at least 1",
                        t
                    ))
                }
                Ok(secs) => secs,
                Err(e) => return Err(anyhow!("Invalid request_timeout_secs '{}': {}", t, e)),
            },
            None => defaults.request_timeout_secs,
        };

        let address = config
            .get("address")
            .cloned()
            .unwrap_or(defaults.address);

        let port = match config.get("port") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid port '{}': {}", p, e))?,
            None => defaults.port,
        };

        Ok(MatchgateConfig {
            default_platform,
            api_key,
            upstream_url,
            request_timeout_secs,
            address,
            port,
        })
    }

    /// Platform registry with the configured default
    pub fn platform_registry(&self) -> StaticPlatformRegistry {
        StaticPlatformRegistry::new(self.default_platform)
    }

    /// Get the upstream request timeout as Duration
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let default_platform = self
            .default_platform
            .map(|p| format!("{} ({})", p.tag(), p.region()))
            .unwrap_or_else(|| "(none)".to_string());
        let api_key = match &self.api_key {
            Some(key) => mask_key(key),
            None => "(not set)".to_string(),
        };

        let lines = [
            format!("Config File:        {}", Self::config_file_path()),
            format!("Default Platform:   {}", default_platform),
            format!("API Key:            {}", api_key),
            format!("Upstream URL:       {}", self.upstream_url),
            format!("Request Timeout:    {} seconds", self.request_timeout_secs),
            format!("Bind Address:       {}", self.bind_address()),
        ];

        lines.join("\n")
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.matchgate", home_dir))
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.matchgate/matchgate.toml", home_dir)
    }
}

/// Keep the last four characters of a secret
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformRegistry;
    use std::io::Write;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = MatchgateConfig::default();
        assert!(config.default_platform.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_from_map() {
        let config = MatchgateConfig::from_map(&settings(&[
            ("default_platform", "na1"),
            ("api_key", "RGAPI-secret"),
            ("request_timeout_secs", "3"),
            ("address", "0.0.0.0"),
            ("port", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.default_platform, Some(Platform::NorthAmerica));
        assert_eq!(config.api_key.as_deref(), Some("RGAPI-secret"));
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(3));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(
            config.platform_registry().default_platform(),
            Some(Platform::NorthAmerica)
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config =
            MatchgateConfig::from_map(&settings(&[("default_platform", ""), ("api_key", " ")]))
                .unwrap();
        assert!(config.default_platform.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_default_platform() {
        let err = MatchgateConfig::from_map(&settings(&[("default_platform", "ZZZ")]))
            .unwrap_err();
        assert!(err.to_string().contains("default_platform"));
    }

    #[test]
    fn test_invalid_request_timeout() {
        let err = MatchgateConfig::from_map(&settings(&[("request_timeout_secs", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        let err =
            MatchgateConfig::from_map(&settings(&[("request_timeout_secs", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_invalid_port() {
        assert!(MatchgateConfig::from_map(&settings(&[("port", "http")])).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_platform = \"EUW1\"").unwrap();
        writeln!(file, "port = 9100").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = MatchgateConfig::new(&Some(path)).unwrap();
        assert_eq!(config.default_platform, Some(Platform::EuropeWest));
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matchgate.toml");
        let config = MatchgateConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();

        assert!(path.exists());
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
    }

    #[test]
    fn test_summary_masks_api_key() {
        let config = MatchgateConfig {
            api_key: Some("RGAPI-0123456789".to_string()),
            default_platform: Some(Platform::Korea),
            ..Default::default()
        };
        let summary = config.summary();
        assert!(summary.contains("KR (KR)"));
        assert!(summary.contains("6789"));
        assert!(!summary.contains("RGAPI-0123"));
        assert_eq!(mask_key("abc"), "***");
    }
}
