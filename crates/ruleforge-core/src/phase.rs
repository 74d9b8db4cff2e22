// crates/ruleforge-core/src/phase.rs
// ============================================================================
// Module: Pipeline Phases
// Description: Enumerated backend pipeline stage combinations.
// Purpose: Name the selectable phases and whether they need a source PDF.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The backend pipeline has three stages: rule extraction (1), SQL execution
//! (2), and explanation generation (3). A phase is one of five supported
//! combinations, sent to the backend as its stage digits (`"123"`, `"12"`,
//! ...). Any phase that includes extraction requires an uploaded document.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// A selectable pipeline phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Phase {
    /// Extract rules, execute SQL, and generate explanations.
    #[default]
    FullScan,
    /// Extract rules and execute SQL.
    ExtractAndSql,
    /// Extract rules only.
    ExtractOnly,
    /// Execute SQL against existing rules.
    ValidateOnly,
    /// Generate explanations for existing violations.
    ExplainOnly,
}

/// Error returned for unknown phase codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase {0:?}; expected one of 123, 12, 1, 2, 3")]
pub struct UnknownPhase(pub String);

impl Phase {
    /// All phases in presentation order.
    pub const ALL: [Self; 5] =
        [Self::FullScan, Self::ExtractAndSql, Self::ExtractOnly, Self::ValidateOnly, Self::ExplainOnly];

    /// Returns the stage-digit code sent to the backend.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FullScan => "123",
            Self::ExtractAndSql => "12",
            Self::ExtractOnly => "1",
            Self::ValidateOnly => "2",
            Self::ExplainOnly => "3",
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullScan => "Full Scan",
            Self::ExtractAndSql => "Extract + SQL",
            Self::ExtractOnly => "Extract Only",
            Self::ValidateOnly => "Validate Only",
            Self::ExplainOnly => "Explain Only",
        }
    }

    /// Returns a one-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FullScan => "Extract rules + Execute SQL + Generate explanations",
            Self::ExtractAndSql => "Parse PDF and run violation queries",
            Self::ExtractOnly => "Parse PDF and extract policy rules",
            Self::ValidateOnly => "Check data against existing rules (no PDF needed)",
            Self::ExplainOnly => "Generate AI explanations for violations",
        }
    }

    /// Returns true when the phase includes rule extraction.
    #[must_use]
    pub const fn requires_document(self) -> bool {
        matches!(self, Self::FullScan | Self::ExtractAndSql | Self::ExtractOnly)
    }
}

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|phase| phase.code() == trimmed)
            .ok_or_else(|| UnknownPhase(trimmed.to_string()))
    }
}

impl TryFrom<String> for Phase {
    type Error = UnknownPhase;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Phase> for String {
    fn from(value: Phase) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
