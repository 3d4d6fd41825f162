//! Threat log book
//!
//! Historical record of security incidents and their resolutions. Held in
//! memory only, newest entry first.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Severity, Status};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogBookError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Threat log not found: {0}")]
    NotFound(String),
}

/// A recorded incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatLog {
    pub id: String,
    /// UTC date, `YYYY-MM-DD`
    pub date: String,
    pub threat_description: String,
    pub severity: Severity,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_systems: Option<String>,
}

/// Fields supplied when recording a new incident
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThreatLog {
    #[serde(default)]
    pub threat_description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub affected_systems: Option<String>,
}

/// Edits to an existing incident. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatLogPatch {
    #[serde(default)]
    pub threat_description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub affected_systems: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ThreatLogBook {
    logs: Vec<ThreatLog>,
}

impl ThreatLogBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book holding the sample incidents shown on first start
    pub fn seeded() -> Self {
        let seed = |id: &str,
                    date: &str,
                    description: &str,
                    severity: Severity,
                    status: Status,
                    notes: &str,
                    systems: &str| ThreatLog {
            id: id.to_string(),
            date: date.to_string(),
            threat_description: description.to_string(),
            severity,
            status,
            resolution_notes: Some(notes.to_string()),
            affected_systems: Some(systems.to_string()),
        };

        Self {
            logs: vec![
                seed(
                    "TL001",
                    "2024-07-15",
                    "Phishing attempt detected from spoofed email.",
                    Severity::Medium,
                    Status::Resolved,
                    "Blocked sender domain, educated user.",
                    "user@example.com",
                ),
                seed(
                    "TL002",
                    "2024-07-10",
                    "Malware found on endpoint WKSTN-042.",
                    Severity::High,
                    Status::Resolved,
                    "Malware quarantined and removed. System scanned and cleared.",
                    "WKSTN-042",
                ),
                seed(
                    "TL003",
                    "2024-07-05",
                    "Unusual login activity on SRV-APP-03.",
                    Severity::Critical,
                    Status::Investigating,
                    "",
                    "SRV-APP-03",
                ),
                seed(
                    "TL004",
                    "2024-06-28",
                    "Minor port scan detected from external IP.",
                    Severity::Low,
                    Status::Resolved,
                    "IP added to blocklist. No impact observed.",
                    "Firewall FW-EDGE-01",
                ),
            ],
        }
    }

    /// All logs, newest first
    pub fn list(&self) -> &[ThreatLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ThreatLog> {
        self.logs.iter().find(|log| log.id == id)
    }

    /// Record a new incident dated today (UTC)
    pub fn add(&mut self, new: NewThreatLog) -> Result<ThreatLog, LogBookError> {
        self.add_on(new, Utc::now().date_naive())
    }

    pub fn add_on(&mut self, new: NewThreatLog, date: NaiveDate) -> Result<ThreatLog, LogBookError> {
        let threat_description = new
            .threat_description
            .filter(|d| !d.trim().is_empty())
            .ok_or(LogBookError::MissingField("threatDescription"))?;
        let severity = new.severity.ok_or(LogBookError::MissingField("severity"))?;
        let status = new.status.ok_or(LogBookError::MissingField("status"))?;

        let log = ThreatLog {
            id: format!("TL{:03}", self.logs.len() + 1),
            date: date.format("%Y-%m-%d").to_string(),
            threat_description,
            severity,
            status,
            resolution_notes: Some(new.resolution_notes.unwrap_or_default()),
            affected_systems: Some(new.affected_systems.unwrap_or_default()),
        };

        self.logs.insert(0, log.clone());
        Ok(log)
    }

    /// Apply edits to the log with the given id
    pub fn update(&mut self, id: &str, patch: ThreatLogPatch) -> Result<ThreatLog, LogBookError> {
        let log = self
            .logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or_else(|| LogBookError::NotFound(id.to_string()))?;

        if let Some(description) = patch.threat_description {
            if description.trim().is_empty() {
                return Err(LogBookError::MissingField("threatDescription"));
            }
            log.threat_description = description;
        }
        if let Some(severity) = patch.severity {
            log.severity = severity;
        }
        if let Some(status) = patch.status {
            log.status = status;
        }
        if patch.resolution_notes.is_some() {
            log.resolution_notes = patch.resolution_notes;
        }
        if patch.affected_systems.is_some() {
            log.affected_systems = patch.affected_systems;
        }

        Ok(log.clone())
    }
}
