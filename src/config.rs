use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub remote: RemoteConfig,

    pub cache: CacheConfig,

    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" (default) or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,

    pub base_url: String,

    /// Provider API key. The `QUIZAPI_KEY` environment variable takes
    /// precedence. Without a key the remote stage is skipped.
    pub api_key: Option<String>,

    pub category: String,

    /// Upper bound for the `limit` query parameter.
    pub max_limit: usize,

    /// Pause before every request; the provider throttles bursts.
    pub request_delay_ms: u64,

    pub request_timeout_seconds: u64,

    /// Extra technology → provider tag mappings, merged over the built-in table.
    pub tag_overrides: HashMap<String, String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: constants::remote::QUIZAPI_BASE_URL.to_string(),
            api_key: None,
            category: constants::remote::DEFAULT_CATEGORY.to_string(),
            max_limit: constants::remote::MAX_LIMIT,
            request_delay_ms: constants::remote::REQUEST_DELAY_MS,
            request_timeout_seconds: constants::remote::REQUEST_TIMEOUT_SECONDS,
            tag_overrides: HashMap::new(),
        }
    }
}

impl RemoteConfig {
    /// API key from the environment, falling back to the config file.
    /// Blank values count as absent.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(constants::remote::API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are stale (default: 3600 = 1 hour)
    pub ttl_seconds: u64,

    /// Questions fetched per technology when preloading (default: 5)
    pub prefetch_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: constants::cache::QUESTION_TTL_SECONDS,
            prefetch_count: constants::cache::PREFETCH_COUNT,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,

    pub eviction_interval_minutes: u32,

    pub cron_expression: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eviction_interval_minutes: 15,
            cron_expression: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("quizsource").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quizsource").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("quizsource.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_seconds == 0 {
            anyhow::bail!("Cache TTL must be > 0");
        }

        if self.cache.prefetch_count == 0 {
            anyhow::bail!("Prefetch count must be > 0");
        }

        if self.remote.enabled && self.remote.base_url.trim().is_empty() {
            anyhow::bail!("Remote base URL cannot be empty when enabled");
        }

        if self.remote.enabled && self.remote.max_limit == 0 {
            anyhow::bail!("Remote max_limit must be > 0");
        }

        if self.scheduler.enabled
            && self.scheduler.eviction_interval_minutes == 0
            && self.scheduler.cron_expression.is_none()
        {
            anyhow::bail!("Scheduler interval must be > 0 or cron expression must be set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.cache.prefetch_count, 5);
        assert_eq!(config.remote.max_limit, 20);
        assert_eq!(config.remote.category, "code");
        assert!(config.remote.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("[scheduler]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [remote]
            request_delay_ms = 0

            [remote.tag_overrides]
            svelte = "Svelte"

            [cache]
            ttl_seconds = 120
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.remote.request_delay_ms, 0);
        assert_eq!(
            config.remote.tag_overrides.get("svelte").map(String::as_str),
            Some("Svelte")
        );
        assert_eq!(config.cache.ttl(), Duration::from_secs(120));

        assert_eq!(config.remote.base_url, "https://quizapi.io/api/v1");
        assert_eq!(config.cache.prefetch_count, 5);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_scheduler_without_schedule() {
        let mut config = Config::default();
        config.scheduler.eviction_interval_minutes = 0;
        assert!(config.validate().is_err());

        config.scheduler.cron_expression = Some("0 */5 * * * *".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip_path() {
        let path = std::env::temp_dir()
            .join(format!("quizsource-config-test-{}", uuid::Uuid::new_v4()))
            .join("config.toml");

        let mut config = Config::default();
        config.general.log_level = "warn".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.general.log_level, "warn");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
