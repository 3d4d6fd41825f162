//! Dashboard overview computed from the threat log book

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Severity, Status};
use crate::threat_log::ThreatLog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total: usize,
    /// Incidents not yet resolved
    pub open_incidents: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub critical_open: usize,
}

impl Overview {
    pub fn from_logs(logs: &[ThreatLog]) -> Self {
        let mut by_severity: BTreeMap<String, usize> =
            Severity::ALL.iter().map(|s| (s.to_string(), 0)).collect();
        let mut by_status: BTreeMap<String, usize> =
            Status::ALL.iter().map(|s| (s.to_string(), 0)).collect();

        for log in logs {
            *by_severity.entry(log.severity.to_string()).or_default() += 1;
            *by_status.entry(log.status.to_string()).or_default() += 1;
        }

        let open_incidents = logs.iter().filter(|l| !l.status.is_resolved()).count();
        let critical_open = logs
            .iter()
            .filter(|l| !l.status.is_resolved() && l.severity == Severity::Critical)
            .count();

        Self {
            total: logs.len(),
            open_incidents,
            by_severity,
            by_status,
            critical_open,
        }
    }
}
