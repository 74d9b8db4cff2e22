// crates/ruleforge-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and log filter selection.
// Purpose: Ensure command-line selections map onto console view state.
// Dependencies: ruleforge-cli main helpers, clap
// ============================================================================

//! ## Overview
//! Validates clap parsing of page selections, the value parsers that feed the
//! core filters, and the `RUST_LOG` / config fallback for logging.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::Parser;
use ruleforge_core::HitlAction;
use ruleforge_core::HitlStatus;
use ruleforge_core::Phase;
use ruleforge_core::SeverityLevel;
use ruleforge_core::views::vault::RuleStatusFilter;
use tracing_subscriber::filter::LevelFilter;

use super::ActionArg;
use super::Cli;
use super::CliError;
use super::Commands;
use super::EXIT_LOCKED;
use super::LeftSide;
use super::OutputFormat;
use super::VersionsCommand;
use super::ViolationsCommand;
use super::parse_hitl_status;
use super::parse_left_side;
use super::parse_rule_status;
use super::parse_severity;
use super::resolve_log_filter;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ruleforge").chain(args.iter().copied()))
        .unwrap_or_else(|err| panic!("parse {args:?}: {err}"))
}

// ============================================================================
// SECTION: Value Parsers
// ============================================================================

#[test]
fn severity_parser_is_case_insensitive() {
    assert_eq!(parse_severity("HIGH"), Ok(SeverityLevel::High));
    assert_eq!(parse_severity("low"), Ok(SeverityLevel::Low));
    let err = parse_severity("critical").unwrap_err();
    assert!(err.contains("critical"), "{err}");
}

#[test]
fn status_parsers_map_onto_core_filters() {
    assert_eq!(parse_hitl_status("escalated"), Ok(HitlStatus::Escalated));
    assert!(parse_hitl_status("open").is_err());
    assert_eq!(parse_rule_status("triggered"), Ok(RuleStatusFilter::Triggered));
    assert!(parse_rule_status("broken").is_err());
}

#[test]
fn left_side_accepts_current_or_version_numbers() {
    assert_eq!(parse_left_side("current"), Ok(LeftSide::Current));
    assert_eq!(parse_left_side("CURRENT"), Ok(LeftSide::Current));
    assert_eq!(parse_left_side("4"), Ok(LeftSide::Archived(4)));
    assert_eq!(parse_left_side("v12"), Ok(LeftSide::Archived(12)));
    assert!(parse_left_side("latest").is_err());
    assert!(parse_left_side("-1").is_err());
}

#[test]
fn action_arguments_convert_to_wire_actions() {
    assert_eq!(HitlAction::from(ActionArg::Confirm), HitlAction::Confirm);
    assert_eq!(HitlAction::from(ActionArg::Dismiss), HitlAction::Dismiss);
    assert_eq!(HitlAction::from(ActionArg::Escalate), HitlAction::Escalate);
}

// ============================================================================
// SECTION: Command Parsing
// ============================================================================

#[test]
fn scan_defaults_to_full_phase_without_document() {
    let cli = parse(&["scan"]);
    let Some(Commands::Scan(command)) = cli.command else {
        panic!("expected scan command");
    };
    assert_eq!(command.phase, Phase::default());
    assert!(command.pdf.is_none());
    assert_eq!(cli.format, OutputFormat::Text);
}

#[test]
fn scan_rejects_unknown_phase() {
    assert!(Cli::try_parse_from(["ruleforge", "scan", "--phase", "4"]).is_err());
    let cli = parse(&["scan", "--phase", "3", "--format", "json"]);
    let Some(Commands::Scan(command)) = cli.command else {
        panic!("expected scan command");
    };
    assert_eq!(command.phase.code(), "3");
    assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn global_flags_are_accepted_after_subcommands() {
    let cli = parse(&["versions", "diff", "--left", "2", "--right", "5", "--config", "alt.toml"]);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("alt.toml")));
    let Some(Commands::Versions {
        command: VersionsCommand::Diff(command),
    }) = cli.command
    else {
        panic!("expected versions diff");
    };
    assert_eq!(command.left, LeftSide::Archived(2));
    assert_eq!(command.right, Some(5));
}

#[test]
fn diff_left_defaults_to_current() {
    let cli = parse(&["versions", "diff"]);
    let Some(Commands::Versions {
        command: VersionsCommand::Diff(command),
    }) = cli.command
    else {
        panic!("expected versions diff");
    };
    assert_eq!(command.left, LeftSide::Current);
    assert_eq!(command.right, None);
}

#[test]
fn decide_takes_rule_and_action_positionally() {
    let cli = parse(&["violations", "decide", "R-7", "escalate", "--notes", "needs review"]);
    let Some(Commands::Violations {
        command: ViolationsCommand::Decide(command),
    }) = cli.command
    else {
        panic!("expected violations decide");
    };
    assert_eq!(command.rule_id, "R-7");
    assert_eq!(command.action, ActionArg::Escalate);
    assert_eq!(command.notes, "needs review");
    assert!(command.analyst.is_none());
    assert!(Cli::try_parse_from(["ruleforge", "violations", "decide", "R-7", "approve"]).is_err());
}

#[test]
fn live_once_conflicts_with_ticks() {
    assert!(Cli::try_parse_from(["ruleforge", "live", "--once", "--ticks", "3"]).is_err());
    let cli = parse(&["live", "--ticks", "3"]);
    let Some(Commands::Live(command)) = cli.command else {
        panic!("expected live command");
    };
    assert!(!command.once);
    assert_eq!(command.ticks, Some(3));
}

#[test]
fn vault_status_defaults_to_all() {
    let cli = parse(&["vault", "--category", "threshold"]);
    let Some(Commands::Vault(command)) = cli.command else {
        panic!("expected vault command");
    };
    assert_eq!(command.status, RuleStatusFilter::All);
    assert_eq!(command.category.as_deref(), Some("threshold"));
    assert!(command.search.is_empty());
}

// ============================================================================
// SECTION: Errors and Logging
// ============================================================================

#[test]
fn locked_errors_use_the_locked_exit_code() {
    assert_eq!(CliError::locked(String::from("locked")).code, EXIT_LOCKED);
    assert_eq!(CliError::new(String::from("failed")).code, 1);
}

#[test]
fn log_filter_prefers_environment_then_config() {
    let env = resolve_log_filter(Some("debug"), "error");
    assert_eq!(env.max_level_hint(), Some(LevelFilter::DEBUG));
    let config = resolve_log_filter(None, "info");
    assert_eq!(config.max_level_hint(), Some(LevelFilter::INFO));
    let blank_env = resolve_log_filter(Some("  "), "error");
    assert_eq!(blank_env.max_level_hint(), Some(LevelFilter::ERROR));
}

#[test]
fn invalid_log_filters_fall_back_to_warn() {
    let filter = resolve_log_filter(Some("ruleforge=bogus"), "also=bogus");
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}
