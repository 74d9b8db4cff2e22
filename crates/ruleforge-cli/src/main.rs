// crates/ruleforge-cli/src/main.rs
// ============================================================================
// Module: RuleForge CLI Entry Point
// Description: Command dispatcher for the RuleForge compliance console.
// Purpose: One subcommand per console page, rendered as text or JSON.
// Dependencies: clap, ruleforge-client, ruleforge-config, ruleforge-core, thiserror, tokio, tracing.
// ============================================================================

//! ## Overview
//! The RuleForge CLI stands in for the pages of the compliance dashboard.
//! Pages that need rule data check the gate first and exit with code 2 while
//! it is locked. User-facing strings are routed through the message catalog;
//! logs go to stderr so stdout stays machine-readable.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use ruleforge_cli::render;
use ruleforge_cli::t;
use ruleforge_client::ApiClient;
use ruleforge_client::ApiError;
use ruleforge_client::Gate;
use ruleforge_client::LiveMonitor;
use ruleforge_client::LiveSource;
use ruleforge_client::PdfDocument;
use ruleforge_client::PipelineBackend;
use ruleforge_client::RunController;
use ruleforge_client::RunEvent;
use ruleforge_client::RunOutcome;
use ruleforge_client::RunSettings;
use ruleforge_client::RunState;
use ruleforge_client::StatsSource;
use ruleforge_config::ConsoleConfig;
use ruleforge_config::LoggingConfig;
use ruleforge_core::AuditEventType;
use ruleforge_core::GateStatus;
use ruleforge_core::HitlAction;
use ruleforge_core::HitlDecision;
use ruleforge_core::HitlStatus;
use ruleforge_core::LiveStatus;
use ruleforge_core::Phase;
use ruleforge_core::Route;
use ruleforge_core::RouteView;
use ruleforge_core::RuleDiff;
use ruleforge_core::SeverityLevel;
use ruleforge_core::SnapshotLabel;
use ruleforge_core::VersionSnapshot;
use ruleforge_core::Violation;
use ruleforge_core::diff_snapshots;
use ruleforge_core::routes::resolve;
use ruleforge_core::views::audit::AuditFilter;
use ruleforge_core::views::audit::AuditSummary;
use ruleforge_core::views::audit::recent_runs;
use ruleforge_core::views::dashboard::DashboardKpis;
use ruleforge_core::views::dashboard::PieSegment;
use ruleforge_core::views::dashboard::SeverityBreakdown;
use ruleforge_core::views::dashboard::filter_by_severity;
use ruleforge_core::views::dashboard::pie_segments;
use ruleforge_core::views::live::LiveMetrics;
use ruleforge_core::views::live::LiveRow;
use ruleforge_core::views::live::live_rows;
use ruleforge_core::views::pagination::PageSlice;
use ruleforge_core::views::pagination::paginate;
use ruleforge_core::views::vault::RuleFilter;
use ruleforge_core::views::vault::RuleStatusFilter;
use ruleforge_core::views::vault::VaultSummary;
use ruleforge_core::views::vault::categories;
use ruleforge_core::views::violations::ViolationFilter;
use ruleforge_core::views::violations::ViolationSummary;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for failed commands.
const EXIT_FAILURE: u8 = 1;
/// Exit code for gated commands refused while the gate is locked.
const EXIT_LOCKED: u8 = 2;
/// Log filter used when neither `RUST_LOG` nor the config level parses.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Selector for the live rule set in `versions diff --left`.
const CURRENT_SELECTOR: &str = "current";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "ruleforge", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Configuration file (overrides `RULEFORGE_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a policy PDF and run the compliance pipeline.
    Scan(ScanCommand),
    /// List recent pipeline runs.
    Runs,
    /// Show the gate status and which pages it opens.
    Gate,
    /// Show or validate the console configuration.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Compliance KPIs, severity breakdown, and violations table.
    Dashboard(DashboardCommand),
    /// Browse extracted rules.
    Vault(VaultCommand),
    /// Review violations and record analyst decisions.
    Violations {
        /// Selected violations subcommand.
        #[command(subcommand)]
        command: ViolationsCommand,
    },
    /// Inspect archived rule versions.
    Versions {
        /// Selected versions subcommand.
        #[command(subcommand)]
        command: VersionsCommand,
    },
    /// Browse the audit log.
    Audit(AuditCommand),
    /// Watch live ingestion status.
    Live(LiveCommand),
    /// Print download links for exports.
    Export(ExportCommand),
}

/// Arguments for `scan`.
#[derive(Args, Debug)]
struct ScanCommand {
    /// Pipeline phase code (123, 12, 1, 2, 3).
    #[arg(long, value_name = "PHASE", default_value = "123")]
    phase: Phase,
    /// Source PDF, required by phases that extract rules.
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Validate the configuration and report its source.
    Validate,
}

/// Arguments for `dashboard`.
#[derive(Args, Debug)]
struct DashboardCommand {
    /// Only show violations of this severity.
    #[arg(long, value_name = "LEVEL", value_parser = parse_severity)]
    severity: Option<SeverityLevel>,
    /// One-based table page.
    #[arg(long, value_name = "N", default_value_t = 1)]
    page: usize,
}

/// Arguments for `vault`.
#[derive(Args, Debug)]
struct VaultCommand {
    /// Search over rule id, description, and condition field.
    #[arg(long, value_name = "TEXT", default_value = "")]
    search: String,
    /// Rule type to keep (`All` keeps everything).
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,
    /// Rule status filter (all, triggered, clear).
    #[arg(long, value_name = "STATUS", default_value = "all", value_parser = parse_rule_status)]
    status: RuleStatusFilter,
}

/// Violations subcommands.
#[derive(Subcommand, Debug)]
enum ViolationsCommand {
    /// List violations.
    List(ViolationListCommand),
    /// Record an analyst decision against a violation.
    Decide(DecideCommand),
}

/// Arguments for `violations list`.
#[derive(Args, Debug)]
struct ViolationListCommand {
    /// Search over rule id and description.
    #[arg(long, value_name = "TEXT", default_value = "")]
    search: String,
    /// Only show violations of this severity.
    #[arg(long, value_name = "LEVEL", value_parser = parse_severity)]
    severity: Option<SeverityLevel>,
    /// Only show violations with this review status.
    #[arg(long, value_name = "STATUS", value_parser = parse_hitl_status)]
    status: Option<HitlStatus>,
}

/// Arguments for `violations decide`.
#[derive(Args, Debug)]
struct DecideCommand {
    /// Rule identifier of the violation.
    #[arg(value_name = "RULE")]
    rule_id: String,
    /// Decision to record.
    #[arg(value_enum, value_name = "ACTION")]
    action: ActionArg,
    /// Analyst name (defaults to `[analyst] name`).
    #[arg(long, value_name = "NAME")]
    analyst: Option<String>,
    /// Free-text notes.
    #[arg(long, value_name = "TEXT", default_value = "")]
    notes: String,
}

/// Analyst decisions accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ActionArg {
    /// Confirm the violation.
    Confirm,
    /// Dismiss the violation.
    Dismiss,
    /// Escalate the violation.
    Escalate,
}

impl From<ActionArg> for HitlAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Confirm => Self::Confirm,
            ActionArg::Dismiss => Self::Dismiss,
            ActionArg::Escalate => Self::Escalate,
        }
    }
}

/// Versions subcommands.
#[derive(Subcommand, Debug)]
enum VersionsCommand {
    /// List archived versions.
    List,
    /// Compare two rule sets by fingerprint.
    Diff(VersionDiffCommand),
}

/// Arguments for `versions diff`.
#[derive(Args, Debug)]
struct VersionDiffCommand {
    /// Left side: `current` or an archived version number.
    #[arg(long, value_name = "current|N", default_value = CURRENT_SELECTOR, value_parser = parse_left_side)]
    left: LeftSide,
    /// Right side archived version (defaults to the newest).
    #[arg(long, value_name = "N")]
    right: Option<u64>,
}

/// Left-hand side of a version comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeftSide {
    /// The live rule set.
    Current,
    /// An archived version.
    Archived(u64),
}

/// Arguments for `audit`.
#[derive(Args, Debug)]
struct AuditCommand {
    /// Entries to fetch (defaults to `[audit] limit`).
    #[arg(long, value_name = "N")]
    limit: Option<u32>,
    /// Search over event type, rule id, and details.
    #[arg(long, value_name = "TEXT", default_value = "")]
    search: String,
    /// Only show events with this type tag.
    #[arg(long, value_name = "EVENT")]
    event: Option<String>,
}

/// Arguments for `live`.
#[derive(Args, Debug)]
struct LiveCommand {
    /// Print the current status once and exit.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "ticks")]
    once: bool,
    /// Stop after this many background refreshes.
    #[arg(long, value_name = "N")]
    ticks: Option<usize>,
}

/// Arguments for `export`.
#[derive(Args, Debug)]
struct ExportCommand {
    /// Export to link.
    #[arg(value_enum, value_name = "TARGET")]
    target: ExportTarget,
}

/// Exports offered by the backend.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum ExportTarget {
    /// Violations spreadsheet.
    Violations,
    /// Compliance report.
    Report,
}

/// Output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

// ============================================================================
// SECTION: Argument Parsers
// ============================================================================

/// Parses a severity level argument.
fn parse_severity(value: &str) -> Result<SeverityLevel, String> {
    SeverityLevel::parse(value).ok_or_else(|| t!("args.severity_invalid", value = value))
}

/// Parses a review status argument.
fn parse_hitl_status(value: &str) -> Result<HitlStatus, String> {
    HitlStatus::parse(value).ok_or_else(|| t!("args.status_invalid", value = value))
}

/// Parses a rule status filter argument.
fn parse_rule_status(value: &str) -> Result<RuleStatusFilter, String> {
    RuleStatusFilter::parse(value).ok_or_else(|| t!("args.rule_status_invalid", value = value))
}

/// Parses the left side of a version comparison.
fn parse_left_side(value: &str) -> Result<LeftSide, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(CURRENT_SELECTOR) {
        return Ok(LeftSide::Current);
    }
    value
        .trim_start_matches(['v', 'V'])
        .parse::<u64>()
        .map(LeftSide::Archived)
        .map_err(|_| t!("args.version_invalid", value = value))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a localized message and an exit code.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
    /// Process exit code.
    code: u8,
}

impl CliError {
    /// Constructs a failure from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
            code: EXIT_FAILURE,
        }
    }

    /// Constructs a gate refusal from a localized message.
    const fn locked(message: String) -> Self {
        Self {
            message,
            code: EXIT_LOCKED,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Wraps a backend failure.
fn api_error(error: ApiError) -> CliError {
    CliError::new(t!("api.request_failed", error = error))
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = ConsoleConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    init_logging(&config.logging);
    let console = Console::new(config, cli.format)?;

    match command {
        Commands::Scan(command) => command_scan(&console, command).await,
        Commands::Runs => command_runs(&console).await,
        Commands::Gate => command_gate(&console).await,
        Commands::Config {
            command,
        } => command_config(&console, &command),
        Commands::Dashboard(command) => command_dashboard(&console, &command).await,
        Commands::Vault(command) => command_vault(&console, command).await,
        Commands::Violations {
            command,
        } => match command {
            ViolationsCommand::List(command) => command_violations_list(&console, command).await,
            ViolationsCommand::Decide(command) => {
                command_violations_decide(&console, command).await
            }
        },
        Commands::Versions {
            command,
        } => match command {
            VersionsCommand::List => command_versions_list(&console).await,
            VersionsCommand::Diff(command) => command_versions_diff(&console, &command).await,
        },
        Commands::Audit(command) => command_audit(&console, command).await,
        Commands::Live(command) => command_live(&console, &command).await,
        Commands::Export(command) => command_export(&console, &command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Installs the stderr log subscriber.
fn init_logging(config: &LoggingConfig) {
    let env_filter = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_log_filter(env_filter.as_deref(), &config.level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Picks the log filter: `RUST_LOG` first, then the configured level.
fn resolve_log_filter(env_filter: Option<&str>, configured: &str) -> EnvFilter {
    env_filter
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

// ============================================================================
// SECTION: Console Session
// ============================================================================

/// Shared state for one command invocation.
struct Console {
    /// Effective configuration.
    config: ConsoleConfig,
    /// Backend client.
    client: Arc<ApiClient>,
    /// Selected output format.
    format: OutputFormat,
}

impl Console {
    /// Builds the session from validated configuration.
    fn new(config: ConsoleConfig, format: OutputFormat) -> CliResult<Self> {
        let client = ApiClient::new(&config.api).map_err(api_error)?;
        Ok(Self {
            config,
            client: Arc::new(client),
            format,
        })
    }

    /// Returns a gate bound to the backend stats endpoint.
    fn gate(&self) -> Gate {
        let source: Arc<dyn StatsSource> = self.client.clone();
        Gate::new(source)
    }

    /// Refuses gated pages until a scan has produced rules.
    async fn require_unlocked(&self, route: Route) -> CliResult<()> {
        let status = self.gate().refresh().await;
        match resolve(route, status) {
            RouteView::Page {
                ..
            } => Ok(()),
            RouteView::Locked {
                scan,
            } => Err(CliError::locked(t!("gate.locked", page = route.path(), scan = scan.path()))),
            RouteView::Loading
            | RouteView::Redirect {
                ..
            } => Err(CliError::locked(t!(
                "gate.locked",
                page = route.path(),
                scan = Route::ScanNow.path()
            ))),
        }
    }

    /// Writes `value` as JSON or the rendered lines as text.
    fn emit<T: Serialize>(&self, value: &T, lines: impl FnOnce() -> Vec<String>) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Text => write_lines(&lines()),
        }
    }
}

// ============================================================================
// SECTION: Scan Commands
// ============================================================================

/// Streamed `scan` output record in JSON mode.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ScanRecord<'a> {
    /// Pipeline log line.
    Log(&'a str),
    /// Run outcome.
    Outcome(RunOutcome),
}

/// Executes `scan`.
async fn command_scan(console: &Console, command: ScanCommand) -> CliResult<ExitCode> {
    let backend: Arc<dyn PipelineBackend> = console.client.clone();
    let settings = RunSettings {
        poll_interval: console.config.polling.pipeline_interval(),
        recent_runs_limit: console.config.audit.recent_runs_limit,
    };
    let mut controller = RunController::new(backend, console.gate(), settings);
    if let Some(path) = &command.pdf {
        let document = PdfDocument::from_path(path).map_err(|err| CliError::new(err.to_string()))?;
        controller.select_document(Some(document));
    }

    let mut run = controller.start(command.phase).await;
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let outcome = loop {
        tokio::select! {
            event = run.next_event() => match event {
                Some(RunEvent::Log(line)) => emit_scan_record(console.format, &ScanRecord::Log(&line))?,
                Some(RunEvent::State(RunState::Completed(outcome))) => break Some(outcome),
                Some(RunEvent::State(state)) => debug!(?state, "scan state"),
                None => break None,
            },
            _ = &mut interrupt => break None,
        }
    };
    drop(run);

    let Some(outcome) = outcome else {
        return Err(CliError::new(t!("scan.interrupted")));
    };
    emit_scan_record(console.format, &ScanRecord::Outcome(outcome))?;
    match outcome {
        RunOutcome::Success => {
            if console.format == OutputFormat::Text {
                write_lines(&render::recent_run_lines(&controller.recent_runs()))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Failure => Err(CliError::new(t!("scan.failed"))),
    }
}

/// Writes one streamed scan record.
fn emit_scan_record(format: OutputFormat, record: &ScanRecord<'_>) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let line = serde_json::to_string(record)
                .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
            write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))
        }
        OutputFormat::Text => {
            let line = match record {
                ScanRecord::Log(line) => (*line).to_string(),
                ScanRecord::Outcome(RunOutcome::Success) => t!("scan.succeeded"),
                ScanRecord::Outcome(RunOutcome::Failure) => return Ok(()),
            };
            write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))
        }
    }
}

/// Executes `runs`.
async fn command_runs(console: &Console) -> CliResult<ExitCode> {
    let page =
        console.client.audit_log(console.config.audit.recent_runs_limit).await.map_err(api_error)?;
    let runs = recent_runs(&page.logs);
    console.emit(&runs, || render::recent_run_lines(&runs))?;
    Ok(ExitCode::SUCCESS)
}

/// Route entry in the `gate` report.
#[derive(Serialize)]
struct RouteReport {
    /// Client-side path.
    path: &'static str,
    /// Whether the route needs an unlocked gate.
    gated: bool,
    /// Resolution against the current gate.
    view: RouteView,
}

/// `gate` report.
#[derive(Serialize)]
struct GateReport {
    /// Gate status.
    status: GateStatus,
    /// Route resolutions.
    routes: Vec<RouteReport>,
}

/// Executes `gate`.
async fn command_gate(console: &Console) -> CliResult<ExitCode> {
    let status = console.gate().refresh().await;
    let report = GateReport {
        status,
        routes: Route::ALL
            .into_iter()
            .map(|route| RouteReport {
                path: route.path(),
                gated: route.is_gated(),
                view: resolve(route, status),
            })
            .collect(),
    };
    console.emit(&report, || render::gate_lines(status))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Configuration Commands
// ============================================================================

/// `config validate` report.
#[derive(Serialize)]
struct ConfigValidation {
    /// Always true; invalid configs fail before this point.
    valid: bool,
    /// File the configuration was read from.
    source: Option<String>,
}

/// Executes `config show` and `config validate`.
fn command_config(console: &Console, command: &ConfigCommand) -> CliResult<ExitCode> {
    let config = &console.config;
    match command {
        ConfigCommand::Show => match console.format {
            OutputFormat::Json => write_json(config)?,
            OutputFormat::Text => {
                let text = config
                    .to_toml()
                    .map_err(|err| CliError::new(t!("config.render_failed", error = err)))?;
                write_stdout_line(text.trim_end())
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        },
        ConfigCommand::Validate => {
            let source = config.source.as_ref().map(|path| path.display().to_string());
            let report = ConfigValidation {
                valid: true,
                source: source.clone(),
            };
            console.emit(&report, || {
                vec![source.map_or_else(
                    || t!("config.validate.defaults"),
                    |path| t!("config.validate.ok", path = path),
                )]
            })?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Page Commands
// ============================================================================

/// `dashboard` report.
#[derive(Serialize)]
struct DashboardReport<'a> {
    /// Header KPIs.
    kpis: DashboardKpis,
    /// Severity breakdown.
    breakdown: SeverityBreakdown,
    /// Violation-type pie segments.
    segments: Vec<PieSegment>,
    /// Selected table page.
    page: PageSlice<'a, &'a Violation>,
}

/// Executes `dashboard`.
async fn command_dashboard(console: &Console, command: &DashboardCommand) -> CliResult<ExitCode> {
    console.require_unlocked(Route::Dashboard).await?;
    let stats = console.client.stats().await.map_err(api_error)?;
    let violations = console.client.violations().await.map_err(api_error)?;
    let filtered = filter_by_severity(&violations.violations, command.severity);
    let page_size = usize::try_from(console.config.dashboard.page_size).unwrap_or(usize::MAX);
    let report = DashboardReport {
        kpis: DashboardKpis::from(&stats),
        breakdown: SeverityBreakdown::from_stats(&stats),
        segments: pie_segments(&violations.violations),
        page: paginate(&filtered, command.page, page_size),
    };
    console.emit(&report, || {
        render::dashboard_lines(&report.kpis, &report.breakdown, &report.segments, &report.page)
    })?;
    Ok(ExitCode::SUCCESS)
}

/// `vault` report.
#[derive(Serialize)]
struct VaultReport<'a> {
    /// Counters over the unfiltered rule set.
    summary: VaultSummary,
    /// Category tabs.
    categories: Vec<String>,
    /// Rules passing the filter.
    rules: Vec<&'a ruleforge_core::Rule>,
}

/// Executes `vault`.
async fn command_vault(console: &Console, command: VaultCommand) -> CliResult<ExitCode> {
    console.require_unlocked(Route::PolicyVault).await?;
    let page = console.client.rules(&[]).await.map_err(api_error)?;
    let filter = RuleFilter {
        search: command.search,
        status: command.status,
        ..RuleFilter::default()
    }
    .with_category(command.category.as_deref());
    let report = VaultReport {
        summary: VaultSummary::from_rules(&page.rules),
        categories: categories(&page),
        rules: filter.apply(&page.rules),
    };
    console.emit(&report, || {
        render::vault_lines(&report.summary, &report.categories, &report.rules)
    })?;
    Ok(ExitCode::SUCCESS)
}

/// `violations list` report.
#[derive(Serialize)]
struct ViolationsReport<'a> {
    /// Counters over the unfiltered list.
    summary: ViolationSummary,
    /// Violations passing the filter.
    violations: Vec<&'a Violation>,
}

/// Executes `violations list`.
async fn command_violations_list(
    console: &Console,
    command: ViolationListCommand,
) -> CliResult<ExitCode> {
    console.require_unlocked(Route::Violations).await?;
    let page = console.client.violations().await.map_err(api_error)?;
    let filter = ViolationFilter {
        search: command.search,
        severity: command.severity,
        status: command.status,
    };
    let report = ViolationsReport {
        summary: ViolationSummary::from_violations(&page.violations),
        violations: filter.apply(&page.violations),
    };
    console.emit(&report, || render::violation_lines(&report.summary, &report.violations))?;
    Ok(ExitCode::SUCCESS)
}

/// `violations decide` report.
#[derive(Serialize)]
struct DecisionReport {
    /// Submitted decision.
    decision: HitlDecision,
    /// Backend acknowledgement.
    response: Value,
    /// The violation after reloading, when still listed.
    violation: Option<Violation>,
}

/// Executes `violations decide`.
async fn command_violations_decide(
    console: &Console,
    command: DecideCommand,
) -> CliResult<ExitCode> {
    console.require_unlocked(Route::Violations).await?;
    let decision = HitlDecision {
        rule_id: command.rule_id,
        action: command.action.into(),
        analyst: command.analyst.unwrap_or_else(|| console.config.analyst.name.clone()),
        notes: command.notes,
    };
    let response = console.client.submit_hitl_decision(&decision).await.map_err(api_error)?;
    let reloaded = console.client.violations().await.map_err(api_error)?;
    let violation =
        reloaded.violations.into_iter().find(|violation| violation.rule_id == decision.rule_id);
    let report = DecisionReport {
        decision,
        response,
        violation,
    };
    console.emit(&report, || {
        let status = report
            .violation
            .as_ref()
            .map_or_else(|| report.decision.action.resulting_status(), |found| found.hitl_action);
        vec![t!(
            "violations.decided",
            rule = report.decision.rule_id,
            action = report.decision.action.as_str(),
            analyst = report.decision.analyst,
            status = status
        )]
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `versions list`.
async fn command_versions_list(console: &Console) -> CliResult<ExitCode> {
    console.require_unlocked(Route::PolicyVersions).await?;
    let index = console.client.versions().await.map_err(api_error)?;
    console.emit(&index, || render::version_lines(&index))?;
    Ok(ExitCode::SUCCESS)
}

/// `versions diff` report.
#[derive(Serialize)]
struct DiffReport<'a> {
    /// Left snapshot label.
    left: SnapshotLabel,
    /// Left rule count.
    left_count: usize,
    /// Right snapshot label.
    right: SnapshotLabel,
    /// Right rule count.
    right_count: usize,
    /// Partitioned rules.
    diff: &'a RuleDiff,
}

/// Executes `versions diff`.
async fn command_versions_diff(
    console: &Console,
    command: &VersionDiffCommand,
) -> CliResult<ExitCode> {
    console.require_unlocked(Route::PolicyVersions).await?;
    let right_version = match command.right {
        Some(version) => version,
        None => {
            let index = console.client.versions().await.map_err(api_error)?;
            index.latest().map(|entry| entry.version).ok_or_else(|| {
                CliError::new(t!("versions.none"))
            })?
        }
    };
    let left = match command.left {
        LeftSide::Current => {
            VersionSnapshot::current(console.client.rules(&[]).await.map_err(api_error)?)
        }
        LeftSide::Archived(version) => VersionSnapshot::archived(
            version,
            console.client.version(version).await.map_err(api_error)?,
        ),
    };
    let right = VersionSnapshot::archived(
        right_version,
        console.client.version(right_version).await.map_err(api_error)?,
    );
    let diff = diff_snapshots(&left, &right);
    let report = DiffReport {
        left: left.label,
        left_count: left.rule_count(),
        right: right.label,
        right_count: right.rule_count(),
        diff: &diff,
    };
    console.emit(&report, || render::diff_lines(&left, &right, &diff))?;
    Ok(ExitCode::SUCCESS)
}

/// `audit` report.
#[derive(Serialize)]
struct AuditReport<'a> {
    /// Counters over the fetched page.
    summary: AuditSummary,
    /// Events passing the filter.
    events: Vec<&'a ruleforge_core::AuditEvent>,
}

/// Executes `audit`.
async fn command_audit(console: &Console, command: AuditCommand) -> CliResult<ExitCode> {
    console.require_unlocked(Route::AuditLog).await?;
    let limit = command.limit.unwrap_or(console.config.audit.limit);
    let page = console.client.audit_log(limit).await.map_err(api_error)?;
    let filter = AuditFilter {
        search: command.search,
        event: command.event.map(AuditEventType::from),
    };
    let report = AuditReport {
        summary: AuditSummary::from_page(&page),
        events: filter.apply(&page.logs),
    };
    console.emit(&report, || render::audit_lines(&report.summary, &report.events))?;
    Ok(ExitCode::SUCCESS)
}

/// `live` refresh report.
#[derive(Serialize)]
struct LiveReport<'a> {
    /// RFC 3339 time the refresh was rendered.
    refreshed_at: String,
    /// True when the latest background poll failed.
    connection_lost: bool,
    /// Failure message of the latest poll.
    error: Option<&'a str>,
    /// Headline metrics.
    metrics: LiveMetrics,
    /// Live violations, most hits first.
    rows: Vec<LiveRow>,
    /// Raw status.
    status: &'a LiveStatus,
}

/// Executes `live`.
async fn command_live(console: &Console, command: &LiveCommand) -> CliResult<ExitCode> {
    console.require_unlocked(Route::LiveMonitor).await?;
    let source: Arc<dyn LiveSource> = console.client.clone();
    let monitor = LiveMonitor::new(source, console.config.polling.live_interval());
    let initial = monitor.load().await.map_err(api_error)?;
    emit_live(console, &initial, None)?;
    if command.once {
        return Ok(ExitCode::SUCCESS);
    }

    let mut remaining = command.ticks;
    let mut feed = monitor.watch(initial);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    while remaining.is_none_or(|ticks| ticks > 0) {
        tokio::select! {
            update = feed.next() => {
                let Some(update) = update else { break };
                emit_live(console, &update.status, update.error.as_deref())?;
                remaining = remaining.map(|ticks| ticks.saturating_sub(1));
            }
            _ = &mut interrupt => break,
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Writes one live monitor refresh.
fn emit_live(console: &Console, status: &LiveStatus, error: Option<&str>) -> CliResult<()> {
    let refreshed_at =
        OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| String::from("-"));
    let report = LiveReport {
        refreshed_at,
        connection_lost: error.is_some(),
        error,
        metrics: LiveMetrics::from_status(status),
        rows: live_rows(status),
        status,
    };
    match console.format {
        OutputFormat::Json => {
            let line = serde_json::to_string(&report)
                .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
            write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))
        }
        OutputFormat::Text => {
            let mut lines = vec![t!("live.refreshed", at = report.refreshed_at)];
            if let Some(error) = error {
                lines.push(t!("live.connection_lost", error = error));
            }
            lines.extend(render::live_lines(status));
            write_lines(&lines)
        }
    }
}

/// `export` report.
#[derive(Serialize)]
struct ExportReport {
    /// Download link.
    url: String,
}

/// Executes `export`.
fn command_export(console: &Console, command: &ExportCommand) -> CliResult<ExitCode> {
    let url = match command.target {
        ExportTarget::Violations => console.client.violations_export_url(),
        ExportTarget::Report => console.client.report_url(),
    };
    let report = ExportReport {
        url,
    };
    console.emit(&report, || vec![report.url.clone()])?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes rendered lines to stdout.
fn write_lines(lines: &[String]) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(&mut stdout, "{line}")
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Writes pretty-printed JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns its exit code.
fn emit_error(error: &CliError) -> ExitCode {
    let _ = write_stderr_line(&error.to_string());
    ExitCode::from(error.code)
}
