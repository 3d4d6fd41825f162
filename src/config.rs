use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alert_config::AlertConfig;
use crate::llm::LlmConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Alert thresholds the desk starts with
    #[serde(default, with = "alerts_section")]
    pub alerts: AlertConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config
            .alerts
            .validate()
            .with_context(|| format!("Invalid [alerts] in {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load config from default locations or create default
    pub fn load_or_default() -> Result<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Locations searched by [`Config::load_or_default`], in order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/threatdesk/config.toml")];
        if let Some(dir) = dirs_next::config_dir() {
            paths.push(dir.join("threatdesk/config.toml"));
        }
        paths.push(PathBuf::from("config.toml"));
        paths
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// `[alerts]` uses snake_case keys like every other section, while the HTTP
/// API keeps the camelCase wire names of [`AlertConfig`].
mod alerts_section {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::alert_config::AlertConfig;
    use crate::models::RiskLevel;

    #[derive(Serialize, Deserialize)]
    #[serde(default)]
    struct AlertsSection {
        cpu_usage_threshold: u32,
        failed_login_attempts: u32,
        /// MB
        data_exfiltration_volume: u32,
        anomaly_severity_alert: RiskLevel,
        enable_real_time_scan: bool,
    }

    impl Default for AlertsSection {
        fn default() -> Self {
            Self::from(&AlertConfig::default())
        }
    }

    impl From<&AlertConfig> for AlertsSection {
        fn from(c: &AlertConfig) -> Self {
            Self {
                cpu_usage_threshold: c.cpu_usage_threshold,
                failed_login_attempts: c.failed_login_attempts,
                data_exfiltration_volume: c.data_exfiltration_volume,
                anomaly_severity_alert: c.anomaly_severity_alert,
                enable_real_time_scan: c.enable_real_time_scan,
            }
        }
    }

    impl From<AlertsSection> for AlertConfig {
        fn from(s: AlertsSection) -> Self {
            Self {
                cpu_usage_threshold: s.cpu_usage_threshold,
                failed_login_attempts: s.failed_login_attempts,
                data_exfiltration_volume: s.data_exfiltration_volume,
                anomaly_severity_alert: s.anomaly_severity_alert,
                enable_real_time_scan: s.enable_real_time_scan,
            }
        }
    }

    pub fn serialize<S: Serializer>(alerts: &AlertConfig, serializer: S) -> Result<S::Ok, S::Error> {
        AlertsSection::from(alerts).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AlertConfig, D::Error> {
        AlertsSection::deserialize(deserializer).map(AlertConfig::from)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:9002".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderType;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.llm.provider, ProviderType::Gemini);
        assert_eq!(config.server.bind, "127.0.0.1:9002");
        assert_eq!(config.alerts, AlertConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.bind, config.server.bind);
        assert_eq!(parsed.llm.model(), config.llm.model());
        assert_eq!(parsed.alerts, config.alerts);
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config = toml::from_str(
            r#"
            [llm]
            provider = "ollama"
            strict_choices = true

            [alerts]
            failed_login_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(parsed.llm.provider, ProviderType::Ollama);
        assert!(parsed.llm.strict_choices);
        assert_eq!(parsed.alerts.failed_login_attempts, 3);
        assert_eq!(parsed.alerts.cpu_usage_threshold, 85);
        assert_eq!(parsed.general.log_level, "info");
    }

    #[test]
    fn test_alerts_section_uses_snake_case() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("cpu_usage_threshold = 85"));
        assert!(toml_str.contains("anomaly_severity_alert = \"high\""));
        assert!(!toml_str.contains("cpuUsageThreshold"));

        let parsed: Config = toml::from_str("[alerts]\nenable_real_time_scan = false\n").unwrap();
        assert!(!parsed.alerts.enable_real_time_scan);
        assert_eq!(parsed.alerts.data_exfiltration_volume, 100);

        // HTTP wire names stay camelCase
        let json = serde_json::to_value(&parsed.alerts).unwrap();
        assert_eq!(json["enableRealTimeScan"], false);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("threatdesk-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.server.bind = "0.0.0.0:8080".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.bind, "0.0.0.0:8080");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_bad_alerts() {
        let path = std::env::temp_dir().join(format!("threatdesk-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[alerts]\ncpu_usage_threshold = 150\n").unwrap();
        assert!(Config::load(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
