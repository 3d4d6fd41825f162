pub mod alert_config;
pub mod flows;
pub mod overview;
pub mod threat_logs;
