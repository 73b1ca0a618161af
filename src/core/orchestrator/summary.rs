//! Orchestration results and reporting
//!
//! An [`OrchestrationResult`] is only handed out once a run has finished, so
//! callers never observe a half-built result.

use super::phase::Phase;
use crate::domain::{Assignment, CoverageMetrics, ScheduleVersion, ValidationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// How a single phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// Ran and produced its result without errors
    Succeeded,
    /// Produced a result alongside a non-fatal error
    PartialSuccess,
    /// Ran but its result was discarded
    Failed,
    /// Not attempted
    Skipped,
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseOutcome::Succeeded => "succeeded",
            PhaseOutcome::PartialSuccess => "partial_success",
            PhaseOutcome::Failed => "failed",
            PhaseOutcome::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Per-phase record kept on the result
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub outcome: PhaseOutcome,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PhaseSummary {
    pub fn new(phase: Phase, outcome: PhaseOutcome, duration: Duration) -> Self {
        Self {
            phase,
            outcome,
            duration,
            message: None,
        }
    }

    pub fn skipped(phase: Phase, reason: impl Into<String>) -> Self {
        Self {
            phase,
            outcome: PhaseOutcome::Skipped,
            duration: Duration::ZERO,
            message: Some(reason.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Aggregated outcome of one workflow run
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationResult {
    /// Correlates the result with log lines from the same run
    pub run_id: Uuid,

    /// Version created by the import phase
    pub schedule_version: Option<ScheduleVersion>,

    /// Assignments produced by the scrape phase
    pub assignments: Vec<Assignment>,

    /// Metrics produced by the coverage phase
    pub coverage: Option<CoverageMetrics>,

    /// Diagnostics from every phase, fields prefixed by phase namespace
    pub validation_result: ValidationResult,

    #[serde(with = "duration_ms")]
    pub duration: Duration,

    pub completed_at: DateTime<Utc>,

    pub metadata: BTreeMap<String, serde_json::Value>,

    pub phases: Vec<PhaseSummary>,
}

impl OrchestrationResult {
    /// True when the run finished with no errors in any phase
    ///
    /// A successful return from the orchestrator does not imply this.
    pub fn is_clean(&self) -> bool {
        !self.validation_result.has_errors()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseSummary> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            schedule_version_id = ?self.schedule_version.as_ref().map(|v| v.id.to_string()),
            assignments = self.assignments.len(),
            coverage_pct = ?self.coverage.as_ref().map(|c| c.coverage_percentage),
            errors = self.validation_result.error_count(),
            warnings = self.validation_result.warning_count(),
            duration_ms = self.duration.as_millis() as u64,
            "Import orchestration completed"
        );

        for phase in &self.phases {
            if matches!(phase.outcome, PhaseOutcome::Failed | PhaseOutcome::Skipped) {
                tracing::warn!(
                    run_id = %self.run_id,
                    phase = %phase.phase,
                    outcome = %phase.outcome,
                    message = phase.message.as_deref().unwrap_or(""),
                    "Phase did not complete"
                );
            }
        }

        for warning in self.validation_result.warnings.iter().take(10) {
            tracing::warn!(field = %warning.field, "{}", warning.text);
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> OrchestrationResult {
        OrchestrationResult {
            run_id: Uuid::new_v4(),
            schedule_version: None,
            assignments: Vec::new(),
            coverage: None,
            validation_result: ValidationResult::new(),
            duration: Duration::from_millis(1500),
            completed_at: Utc::now(),
            metadata: BTreeMap::new(),
            phases: vec![
                PhaseSummary::new(Phase::Import, PhaseOutcome::Succeeded, Duration::from_millis(5)),
                PhaseSummary::skipped(Phase::Scrape, "no schedule version"),
            ],
        }
    }

    #[test]
    fn test_clean_result() {
        let mut result = result();
        assert!(result.is_clean());
        result.validation_result.add_error("amion:page", "timeout");
        assert!(!result.is_clean());
    }

    #[test]
    fn test_phase_lookup() {
        let result = result();
        assert_eq!(
            result.phase(Phase::Scrape).map(|p| p.outcome),
            Some(PhaseOutcome::Skipped)
        );
        assert!(result.phase(Phase::Coverage).is_none());
    }

    #[test]
    fn test_serializes_duration_as_millis() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["duration"], 1500);
        assert_eq!(json["phases"][1]["outcome"], "skipped");
        assert_eq!(json["phases"][0]["phase"], "ODS_IMPORT");
    }
}
