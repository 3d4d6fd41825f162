use tokio::sync::RwLock;

use crate::alert_config::AlertConfig;
use crate::llm::FlowSet;
use crate::threat_log::ThreatLogBook;

/// Shared state behind the HTTP API
pub struct AppState {
    /// Read-only after start-up
    pub flows: FlowSet,
    pub logs: RwLock<ThreatLogBook>,
    pub alerts: RwLock<AlertConfig>,
}

impl AppState {
    pub fn new(flows: FlowSet, logs: ThreatLogBook, alerts: AlertConfig) -> Self {
        Self {
            flows,
            logs: RwLock::new(logs),
            alerts: RwLock::new(alerts),
        }
    }
}
