//! Workflow phases and run status

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three sequential steps of a run
///
/// Serializes as its [`Phase::as_str`] name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Schedule file import
    #[serde(rename = "ODS_IMPORT")]
    Import,
    /// External schedule scrape
    #[serde(rename = "AMION_SCRAPE")]
    Scrape,
    /// Coverage calculation
    #[serde(rename = "COVERAGE_CALCULATION")]
    Coverage,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Phase; 3] = [Phase::Import, Phase::Scrape, Phase::Coverage];

    /// Stable name used in diagnostics context and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Import => "ODS_IMPORT",
            Phase::Scrape => "AMION_SCRAPE",
            Phase::Coverage => "COVERAGE_CALCULATION",
        }
    }

    /// Label used in transaction audit logs and errors
    pub fn audit_label(&self) -> &'static str {
        match self {
            Phase::Import => "phase 1 (schedule import)",
            Phase::Scrape => "phase 2 (schedule scrape)",
            Phase::Coverage => "phase 3 (coverage calculation)",
        }
    }

    /// Namespace prepended to the fields of this phase's diagnostics
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Phase::Import => "ods",
            Phase::Scrape => "amion",
            Phase::Coverage => "coverage",
        }
    }

    /// Field of the run-level warning recorded when this phase degrades
    pub fn warning_field(&self) -> &'static str {
        match self {
            Phase::Import => "ods_import",
            Phase::Scrape => "amion_scrape",
            Phase::Coverage => "coverage_calc",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the most recent run on an orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum OrchestrationStatus {
    #[default]
    Idle = 0,
    InProgress = 1,
    Completed = 2,
    Failed = 3,
}

impl OrchestrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestrationStatus::Idle => "IDLE",
            OrchestrationStatus::InProgress => "IN_PROGRESS",
            OrchestrationStatus::Completed => "COMPLETED",
            OrchestrationStatus::Failed => "FAILED",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => OrchestrationStatus::InProgress,
            2 => OrchestrationStatus::Completed,
            3 => OrchestrationStatus::Failed,
            _ => OrchestrationStatus::Idle,
        }
    }
}

impl fmt::Display for OrchestrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
