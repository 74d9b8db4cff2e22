// crates/ruleforge-core/src/severity.rs
// ============================================================================
// Module: Severity Classifier
// Description: Maps violation counts onto severity levels.
// Purpose: Keep the live monitor and violations views on one breakpoint table.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Severity is a pure function of a violation count with fixed breakpoints:
//! `0` is clear, below [`MEDIUM_THRESHOLD`] is low, below [`HIGH_THRESHOLD`]
//! is medium, anything else is high.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Smallest violation count classified as medium.
pub const MEDIUM_THRESHOLD: u64 = 50;
/// Smallest violation count classified as high.
pub const HIGH_THRESHOLD: u64 = 500;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity level of a rule's violations.
///
/// # Invariants
/// - Variant order matches increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityLevel {
    /// No violations.
    #[serde(alias = "clear")]
    Clear,
    /// Fewer than 50 violations.
    #[serde(alias = "low")]
    Low,
    /// 50 to 499 violations.
    #[serde(alias = "medium")]
    Medium,
    /// 500 or more violations.
    #[serde(alias = "high")]
    High,
}

impl SeverityLevel {
    /// Returns the lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a level label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" => Some(Self::Clear),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies a violation count.
#[must_use]
pub const fn classify(count: u64) -> SeverityLevel {
    if count == 0 {
        SeverityLevel::Clear
    } else if count < MEDIUM_THRESHOLD {
        SeverityLevel::Low
    } else if count < HIGH_THRESHOLD {
        SeverityLevel::Medium
    } else {
        SeverityLevel::High
    }
}
