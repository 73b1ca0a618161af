//! Coverage metrics produced by the coverage calculation phase

use super::ids::{ScheduleVersionId, ShiftInstanceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calculated coverage for one schedule version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Schedule version these metrics apply to
    pub schedule_version_id: ScheduleVersionId,

    /// Overall coverage, 0-100
    pub coverage_percentage: f64,

    /// Positions that have an assignment
    pub assigned_positions: u32,

    /// Positions that need one
    pub required_positions: u32,

    /// Shift instances with no assignment
    #[serde(default)]
    pub uncovered_shifts: Vec<ShiftInstanceId>,

    /// Shift instances with more than one assignment
    #[serde(default)]
    pub overallocated_shifts: Vec<ShiftInstanceId>,

    /// When the metrics were computed
    pub calculated_at: DateTime<Utc>,

    /// Free-form breakdowns (e.g. "night_coverage")
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl CoverageMetrics {
    /// Creates metrics from assigned/required counts; percentage is derived
    pub fn from_counts(
        schedule_version_id: ScheduleVersionId,
        assigned_positions: u32,
        required_positions: u32,
    ) -> Self {
        let coverage_percentage = if required_positions == 0 {
            100.0
        } else {
            (f64::from(assigned_positions) / f64::from(required_positions) * 100.0).min(100.0)
        };

        Self {
            schedule_version_id,
            coverage_percentage,
            assigned_positions,
            required_positions,
            uncovered_shifts: Vec::new(),
            overallocated_shifts: Vec::new(),
            calculated_at: Utc::now(),
            details: BTreeMap::new(),
        }
    }

    /// Returns true when every required position is filled
    pub fn is_fully_covered(&self) -> bool {
        self.assigned_positions >= self.required_positions && self.uncovered_shifts.is_empty()
    }
}
