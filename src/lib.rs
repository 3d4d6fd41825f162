//! threatdesk
//!
//! Security-operations desk built around three schema-validated AI flows
//! (threat summarization, response suggestion, threat briefing), with an
//! in-memory threat log book and alert settings exposed over a CLI and a
//! JSON HTTP API.

pub mod alert_config;
pub mod config;
pub mod llm;
pub mod models;
pub mod overview;
pub mod server;
pub mod threat_log;
