//! Alert thresholds
//!
//! In-memory settings deciding when the desk raises an alert. Replaced as a
//! whole on save; every field is range checked first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RiskLevel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertConfigError {
    #[error("cpuUsageThreshold must be between 0 and 100, got {0}")]
    CpuThreshold(u32),
    #[error("failedLoginAttempts must be at least 1, got {0}")]
    FailedLogins(u32),
    #[error("dataExfiltrationVolume must be at least 1 MB, got {0}")]
    ExfiltrationVolume(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AlertConfig {
    /// CPU usage (%) above which an alert is raised
    pub cpu_usage_threshold: u32,
    /// Failed logins before an alert is raised
    pub failed_login_attempts: u32,
    /// Outbound volume in MB treated as exfiltration
    pub data_exfiltration_volume: u32,
    /// Minimum anomaly severity that alerts
    pub anomaly_severity_alert: RiskLevel,
    pub enable_real_time_scan: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cpu_usage_threshold: 85,
            failed_login_attempts: 5,
            data_exfiltration_volume: 100,
            anomaly_severity_alert: RiskLevel::High,
            enable_real_time_scan: true,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), AlertConfigError> {
        if self.cpu_usage_threshold > 100 {
            return Err(AlertConfigError::CpuThreshold(self.cpu_usage_threshold));
        }
        if self.failed_login_attempts < 1 {
            return Err(AlertConfigError::FailedLogins(self.failed_login_attempts));
        }
        if self.data_exfiltration_volume < 1 {
            return Err(AlertConfigError::ExfiltrationVolume(
                self.data_exfiltration_volume,
            ));
        }
        Ok(())
    }

    /// Whether an anomaly of the given level should alert
    pub fn should_alert(&self, level: RiskLevel) -> bool {
        level >= self.anomaly_severity_alert
    }
}
