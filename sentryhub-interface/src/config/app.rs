use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::ConfigError;

/// Service configuration (sentryhub.toml)
///
/// Every field has a default so a missing file or a partial one is fine.
/// A handful of values can be overridden from `SENTRYHUB_*` environment
/// variables for appliance images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_menu_path")]
    pub menu_path: PathBuf,
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    // Limit service
    #[serde(default = "default_limit_service_url")]
    pub limit_service_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // Timing
    #[serde(default = "default_fact_poll_ms")]
    pub fact_poll_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_inactivity_timeout_ms")]
    pub inactivity_timeout_ms: u64,

    // Host
    #[serde(default = "default_services")]
    pub services: Vec<String>,
    #[serde(default = "default_led_pixels")]
    pub led_pixels: usize,
    #[serde(default = "default_wifi_interface")]
    pub wifi_interface: String,
}

fn default_menu_path() -> PathBuf {
    PathBuf::from("/etc/sentryhub/menu.toml")
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("/var/lib/sentryhub/settings.toml")
}

fn default_limit_service_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_http_timeout_ms() -> u64 {
    2_000
}

fn default_fact_poll_ms() -> u64 {
    5_000
}

fn default_tick_ms() -> u64 {
    crate::tasks::refresh::TICK_INTERVAL_MS
}

fn default_inactivity_timeout_ms() -> u64 {
    sentryhub_core::sleep::INACTIVITY_TIMEOUT_MS
}

fn default_services() -> Vec<String> {
    vec!["db-sentry-limit.service".to_string()]
}

fn default_led_pixels() -> usize {
    20
}

fn default_wifi_interface() -> String {
    "wlan0".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            menu_path: default_menu_path(),
            settings_path: default_settings_path(),
            limit_service_url: default_limit_service_url(),
            http_timeout_ms: default_http_timeout_ms(),
            fact_poll_ms: default_fact_poll_ms(),
            tick_ms: default_tick_ms(),
            inactivity_timeout_ms: default_inactivity_timeout_ms(),
            services: default_services(),
            led_pixels: default_led_pixels(),
            wifi_interface: default_wifi_interface(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults if the file is absent,
    /// then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&text).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            info!("no config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        debug!("loaded config: {:?}", config);
        Ok(config)
    }

    /// Apply `SENTRYHUB_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SENTRYHUB_MENU") {
            self.menu_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SENTRYHUB_SETTINGS") {
            self.settings_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SENTRYHUB_LIMIT_URL") {
            self.limit_service_url = v;
        }
        if let Some(v) = lookup("SENTRYHUB_SERVICES") {
            self.services = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("SENTRYHUB_LED_COUNT") {
            self.led_pixels = v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SENTRYHUB_LED_COUNT",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("SENTRYHUB_SLEEP_MS") {
            self.inactivity_timeout_ms = v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SENTRYHUB_SLEEP_MS",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("SENTRYHUB_WIFI_INTERFACE") {
            self.wifi_interface = v;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// How long polled host facts stay fresh
    pub fn fact_ttl(&self) -> Duration {
        Duration::from_millis(self.fact_poll_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            limit_service_url = "http://hub.local:9000"
            services = ["mosquitto.service"]
            "#,
        )
        .unwrap();

        assert_eq!(config.limit_service_url, "http://hub.local:9000");
        assert_eq!(config.services, vec!["mosquitto.service"]);
        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.inactivity_timeout_ms, 60_000);
        assert_eq!(config.led_pixels, 20);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.http_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SENTRYHUB_SERVICES", "a.service, b.service,"),
            ("SENTRYHUB_LED_COUNT", "8"),
            ("SENTRYHUB_LIMIT_URL", "http://10.0.0.2:8000"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.services, vec!["a.service", "b.service"]);
        assert_eq!(config.led_pixels, 8);
        assert_eq!(config.limit_service_url, "http://10.0.0.2:8000");
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "SENTRYHUB_LED_COUNT").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SENTRYHUB_LED_COUNT", .. }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentryhub.toml");
        std::fs::write(&path, "tick_ms = \"fast\"").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Toml { .. })));
    }
}
