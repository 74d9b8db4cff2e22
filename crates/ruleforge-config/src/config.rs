// crates/ruleforge-config/src/config.rs
// ============================================================================
// Module: RuleForge Console Configuration
// Description: Configuration loading and validation for the RuleForge console.
// Purpose: Provide strict config parsing with hard limits and safe defaults.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file path comes from the `--config` argument, then `RULEFORGE_CONFIG`,
//! then `ruleforge.toml` in the working directory. Only the implicit default
//! file may be absent; an explicitly named file that cannot be read is an
//! error. `RULEFORGE_API_URL` overrides `[api] base_url` after parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "ruleforge.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RULEFORGE_CONFIG";
/// Environment variable used to override the backend base URL.
pub const API_URL_ENV_VAR: &str = "RULEFORGE_API_URL";
/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum analyst name length in characters.
pub(crate) const MAX_ANALYST_NAME_LENGTH: usize = 128;
/// Inclusive bounds for the pipeline poll interval.
pub(crate) const PIPELINE_INTERVAL_RANGE_MS: (u64, u64) = (100, 60_000);
/// Inclusive bounds for the live monitor poll interval.
pub(crate) const LIVE_INTERVAL_RANGE_MS: (u64, u64) = (500, 300_000);
/// Inclusive bounds for list limits.
pub(crate) const LIMIT_RANGE: (u32, u32) = (1, 10_000);
/// Inclusive bounds for the dashboard page size.
pub(crate) const PAGE_SIZE_RANGE: (u32, u32) = (1, 500);
/// Upper bound for the request timeout.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Poll cadence settings.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Analyst identity recorded on HITL decisions.
    #[serde(default)]
    pub analyst: AnalystConfig,
    /// Audit log fetch limits.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Dashboard presentation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path the configuration was read from, when a file was found.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ConsoleConfig {
    /// Loads configuration using the process environment for overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_env = env::var(CONFIG_ENV_VAR).ok();
        let api_url_env = env::var(API_URL_ENV_VAR).ok();
        Self::load_with_env(path, config_env.as_deref(), api_url_env.as_deref())
    }

    /// Loads configuration with explicitly supplied environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_env(
        path: Option<&Path>,
        config_env: Option<&str>,
        api_url_env: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, config_env)?;
        validate_path(&resolved.path)?;
        let mut config = match fs::read(&resolved.path) {
            Ok(bytes) => {
                let mut parsed = Self::parse(&bytes)?;
                parsed.source = Some(resolved.path);
                parsed
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound && !resolved.explicit => {
                Self::default()
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.path.display())));
            }
        };
        if let Some(base_url) = api_url_env.map(str::trim).filter(|value| !value.is_empty()) {
            config.api.base_url = base_url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration bytes without validating them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the content is oversized, not UTF-8, or not
    /// valid TOML for this model.
    pub fn parse(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration and normalizes the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.polling.validate()?;
        self.analyst.validate()?;
        self.audit.validate()?;
        self.dashboard.validate()?;
        self.logging.validate()
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Backend origin; every endpoint path is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional per-request timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

impl ApiConfig {
    /// Returns the request timeout, when one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Validates and normalizes the API settings.
    fn validate(&mut self) -> Result<(), ConfigError> {
        self.base_url = normalize_base_url(&self.base_url)?;
        if let Some(timeout) = self.timeout_ms
            && (timeout == 0 || timeout > MAX_TIMEOUT_MS)
        {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Poll cadence settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Pipeline status poll interval in milliseconds.
    #[serde(default = "default_pipeline_interval_ms")]
    pub pipeline_interval_ms: u64,
    /// Live monitor poll interval in milliseconds.
    #[serde(default = "default_live_interval_ms")]
    pub live_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            pipeline_interval_ms: default_pipeline_interval_ms(),
            live_interval_ms: default_live_interval_ms(),
        }
    }
}

impl PollingConfig {
    /// Returns the pipeline poll interval.
    #[must_use]
    pub const fn pipeline_interval(&self) -> Duration {
        Duration::from_millis(self.pipeline_interval_ms)
    }

    /// Returns the live monitor poll interval.
    #[must_use]
    pub const fn live_interval(&self) -> Duration {
        Duration::from_millis(self.live_interval_ms)
    }

    /// Validates interval bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("polling.pipeline_interval_ms", self.pipeline_interval_ms, PIPELINE_INTERVAL_RANGE_MS)?;
        check_range("polling.live_interval_ms", self.live_interval_ms, LIVE_INTERVAL_RANGE_MS)
    }
}

/// Analyst identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalystConfig {
    /// Name recorded on HITL decisions.
    #[serde(default = "default_analyst_name")]
    pub name: String,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            name: default_analyst_name(),
        }
    }
}

impl AnalystConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("analyst.name must be non-empty".to_string()));
        }
        if self.name.chars().count() > MAX_ANALYST_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "analyst.name exceeds {MAX_ANALYST_NAME_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Audit log fetch limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Entries requested for the audit page.
    #[serde(default = "default_audit_limit")]
    pub limit: u32,
    /// Entries requested when refreshing recent runs.
    #[serde(default = "default_recent_runs_limit")]
    pub recent_runs_limit: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            limit: default_audit_limit(),
            recent_runs_limit: default_recent_runs_limit(),
        }
    }
}

impl AuditConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("audit.limit", self.limit, LIMIT_RANGE)?;
        check_range("audit.recent_runs_limit", self.recent_runs_limit, LIMIT_RANGE)
    }
}

/// Dashboard presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Violations per table page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl DashboardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("dashboard.page_size", self.page_size, PAGE_SIZE_RANGE)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level must be non-empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// A resolved config path and whether it was named explicitly.
struct ResolvedPath {
    path: PathBuf,
    explicit: bool,
}

/// Resolves the config path: argument, then environment, then default.
fn resolve_path(path: Option<&Path>, config_env: Option<&str>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Some(env_path) = config_env.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            explicit: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        explicit: false,
    })
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates an absolute http(s) base URL and strips trailing slashes.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the URL is malformed, relative, or
/// uses a scheme other than http or https.
pub fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|err| ConfigError::Invalid(format!("api.base_url is not a valid url: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("api.base_url must use http or https".to_string()));
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::Invalid("api.base_url must include a host".to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Checks an inclusive numeric range.
fn check_range<T>(field: &str, value: T, (min, max): (T, T)) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_pipeline_interval_ms() -> u64 {
    1_500
}

const fn default_live_interval_ms() -> u64 {
    4_000
}

fn default_analyst_name() -> String {
    "analyst".to_string()
}

const fn default_audit_limit() -> u32 {
    200
}

const fn default_recent_runs_limit() -> u32 {
    20
}

const fn default_page_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
