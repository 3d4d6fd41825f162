use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};

use threatdesk::config::Config;
use threatdesk::llm::{BriefingInput, FlowSet, SuggestResponseInput, SummarizeInput};
use threatdesk::models::{RiskLevel, Severity, Status};
use threatdesk::overview::Overview;
use threatdesk::server::{self, AppState};
use threatdesk::llm::ProviderType;
use threatdesk::threat_log::{ThreatLog, ThreatLogBook};

#[derive(Parser)]
#[command(name = "threatdesk")]
#[command(author, version, about = "AI-assisted security operations desk")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Model provider (overrides [llm] provider): gemini, openai, anthropic, ollama
    #[arg(short, long, global = true)]
    pub provider: Option<ProviderType>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize threat data and assess its risk level
    Summarize {
        #[command(flatten)]
        data: ThreatDataArgs,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Suggest a remediation strategy for a detected threat
    Suggest {
        /// Description of the detected threat
        #[arg(long)]
        description: String,

        /// Affected systems (IP addresses or hostnames)
        #[arg(long)]
        systems: String,

        /// Sensitivity of the data at risk (e.g. high, medium, low)
        #[arg(long, default_value = "medium")]
        sensitivity: String,

        /// Applicable regulatory requirements (e.g. GDPR, HIPAA)
        #[arg(long, default_value = "None")]
        compliance: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Generate a threat briefing from aggregated data
    Briefing {
        #[command(flatten)]
        data: ThreatDataArgs,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the threat log book
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Show the configured alert thresholds
    AlertConfig {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Listen address (overrides [server] bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate default configuration file
    GenConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum LogsAction {
    /// List recorded incidents
    List {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Incident totals by severity and status
    Overview,
}

/// Threat data from an argument, a file, or stdin
#[derive(clap::Args)]
pub struct ThreatDataArgs {
    /// Threat data text
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,

    /// Read threat data from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl ThreatDataArgs {
    fn read(self) -> Result<String> {
        if let Some(data) = self.data {
            return Ok(data);
        }
        if let Some(path) = self.file {
            return std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        let mut data = String::new();
        std::io::stdin()
            .read_to_string(&mut data)
            .context("Failed to read threat data from stdin")?;
        if data.trim().is_empty() {
            bail!("No threat data given (use --data, --file or stdin)");
        }
        Ok(data)
    }
}

/// Table row for threat logs
#[derive(Tabled)]
struct ThreatLogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Affected")]
    affected: String,
}

pub async fn run_command(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }

    match cli.command {
        Commands::Summarize { data, json } => cmd_summarize(config, data, json).await,
        Commands::Suggest {
            description,
            systems,
            sensitivity,
            compliance,
            json,
        } => {
            let input = SuggestResponseInput {
                threat_description: description,
                affected_systems: systems,
                data_sensitivity: sensitivity,
                regulatory_compliance: compliance,
            };
            cmd_suggest(config, input, json).await
        }
        Commands::Briefing { data, json } => cmd_briefing(config, data, json).await,
        Commands::Logs { action } => cmd_logs(action),
        Commands::AlertConfig { json } => cmd_alert_config(config, json),
        Commands::Serve { bind } => cmd_serve(config, bind).await,
        Commands::GenConfig { output } => cmd_gen_config(output),
    }
}

fn flows(config: &Config) -> Result<FlowSet> {
    FlowSet::from_config(&config.llm).with_context(|| {
        format!(
            "Failed to create {} provider (model {})",
            config.llm.provider,
            config.llm.model()
        )
    })
}

fn colorize_risk(text: &str) -> ColoredString {
    match RiskLevel::parse(text) {
        Some(RiskLevel::Critical) => text.red().bold(),
        Some(RiskLevel::High) => text.red(),
        Some(RiskLevel::Medium) => text.yellow(),
        Some(RiskLevel::Low) => text.green(),
        None => text.normal(),
    }
}

fn colorize_severity(severity: Severity) -> String {
    let text = severity.to_string();
    match severity {
        Severity::Critical => text.red().bold().to_string(),
        Severity::High => text.red().to_string(),
        Severity::Medium => text.yellow().to_string(),
        Severity::Low => text.green().to_string(),
    }
}

fn colorize_status(status: Status) -> String {
    let text = status.to_string();
    match status {
        Status::Open => text.red().to_string(),
        Status::Investigating => text.yellow().to_string(),
        Status::Resolved => text.green().to_string(),
    }
}

async fn cmd_summarize(config: Config, data: ThreatDataArgs, json: bool) -> Result<()> {
    let flows = flows(&config)?;
    let input = SummarizeInput::new(data.read()?);
    let output = flows.summarize_threat_data(&input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "=== Threat Summary ===".bold());
    println!();
    println!("{}", output.summary);
    println!();
    println!("Risk level: {}", colorize_risk(&output.risk_level));
    if let Some(level) = output.risk() {
        if config.alerts.should_alert(level) {
            println!(
                "{}",
                format!(
                    "ALERT: risk at or above the configured threshold ({})",
                    config.alerts.anomaly_severity_alert
                )
                .red()
                .bold()
            );
        }
    }
    if let Some(recommendations) = &output.recommendations {
        println!("\n{}", "Recommendations:".bold());
        println!("{}", recommendations);
    }

    Ok(())
}

async fn cmd_suggest(config: Config, input: SuggestResponseInput, json: bool) -> Result<()> {
    let flows = flows(&config)?;
    let output = flows.suggest_response(&input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "=== Suggested Response ===".bold());
    println!("\n{}", "Strategy:".bold());
    println!("{}", output.suggested_strategy);
    println!("\n{}", "Estimated impact:".bold());
    println!("{}", output.estimated_impact);
    println!("\n{}", "Resource requirements:".bold());
    println!("{}", output.resource_requirements);
    println!("\n{}", "Communication plan:".bold());
    println!("{}", output.communication_plan);

    Ok(())
}

async fn cmd_briefing(config: Config, data: ThreatDataArgs, json: bool) -> Result<()> {
    let flows = flows(&config)?;
    let input = BriefingInput::new(data.read()?);
    let output = flows.generate_threat_briefing(&input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", "=== Threat Briefing ===".bold());
        println!();
        println!("{}", output.briefing);
    }

    Ok(())
}

/// Cells stay plain: tabled measures escape codes as visible width
fn log_table(logs: &[ThreatLog]) -> Table {
    let rows: Vec<ThreatLogRow> = logs
        .iter()
        .map(|l| ThreatLogRow {
            id: l.id.clone(),
            date: l.date.clone(),
            description: l.threat_description.clone(),
            severity: l.severity.to_string(),
            status: l.status.to_string(),
            affected: l.affected_systems.clone().unwrap_or_default(),
        })
        .collect();

    Table::new(rows)
}

fn cmd_logs(action: LogsAction) -> Result<()> {
    let book = ThreatLogBook::seeded();

    match action {
        LogsAction::List { format } => {
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(book.list())?);
                return Ok(());
            }

            println!("{}", log_table(book.list()));
        }
        LogsAction::Overview => {
            let overview = Overview::from_logs(book.list());

            println!("{}", "=== Threat Log Overview ===".bold());
            println!();
            println!("Total incidents:  {}", overview.total);
            println!(
                "Open incidents:   {}",
                overview.open_incidents.to_string().yellow()
            );
            println!(
                "Critical & open:  {}",
                overview.critical_open.to_string().red()
            );

            println!("\n{}", "By Severity:".bold());
            for severity in Severity::ALL {
                let count = overview.by_severity.get(&severity.to_string()).copied().unwrap_or(0);
                println!("  {}: {}", colorize_severity(severity), count);
            }

            println!("\n{}", "By Status:".bold());
            for status in Status::ALL {
                let count = overview.by_status.get(&status.to_string()).copied().unwrap_or(0);
                println!("  {}: {}", colorize_status(status), count);
            }
        }
    }

    Ok(())
}

fn cmd_alert_config(config: Config, json: bool) -> Result<()> {
    let alerts = &config.alerts;

    if json {
        println!("{}", serde_json::to_string_pretty(alerts)?);
        return Ok(());
    }

    let on_off = |enabled: bool| {
        if enabled {
            "enabled".green()
        } else {
            "disabled".red()
        }
    };

    println!("{}", "=== Alert Configuration ===".bold());
    println!();
    println!("CPU usage threshold:       {}%", alerts.cpu_usage_threshold);
    println!("Failed login attempts:     {}", alerts.failed_login_attempts);
    println!("Data exfiltration volume:  {} MB", alerts.data_exfiltration_volume);
    println!(
        "Anomaly severity alert:    {}",
        colorize_risk(&alerts.anomaly_severity_alert.to_string())
    );
    println!("Real-time scan:            {}", on_off(alerts.enable_real_time_scan));

    Ok(())
}

async fn cmd_serve(config: Config, bind: Option<String>) -> Result<()> {
    let flows = flows(&config)?;
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());

    let state = AppState::new(flows, ThreatLogBook::seeded(), config.alerts.clone());
    server::serve(Arc::new(state), &bind)
        .await
        .with_context(|| format!("HTTP API on {} failed", bind))
}

fn cmd_gen_config(output: Option<PathBuf>) -> Result<()> {
    let config = Config::default();

    match output {
        Some(path) => {
            config.save(&path)?;
            println!("Configuration written to {}", path.display());
        }
        None => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
