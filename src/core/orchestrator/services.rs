//! Collaborator contracts consumed by the orchestrator
//!
//! The orchestrator never parses files, scrapes the web or computes coverage
//! itself. It drives these three services and interprets what they return.

use crate::core::context::RunContext;
use crate::domain::{
    ActorId, Assignment, CoverageMetrics, OrganizationId, Result, ScheduleVersion,
    ScheduleVersionId, ShiftSyncError, ValidationResult,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

/// What a collaborator hands back: an optional value, its diagnostics and an
/// optional error
///
/// A value together with an error is a partial success.
#[derive(Debug)]
pub struct ServiceOutcome<T> {
    pub value: Option<T>,
    pub validation: Option<ValidationResult>,
    pub error: Option<ShiftSyncError>,
}

impl<T> ServiceOutcome<T> {
    /// Value produced, no error
    pub fn success(value: T, validation: ValidationResult) -> Self {
        Self {
            value: Some(value),
            validation: Some(validation),
            error: None,
        }
    }

    /// Value produced alongside an error
    pub fn partial(value: T, validation: ValidationResult, error: ShiftSyncError) -> Self {
        Self {
            value: Some(value),
            validation: Some(validation),
            error: Some(error),
        }
    }

    /// No value, only an error
    pub fn failure(validation: Option<ValidationResult>, error: ShiftSyncError) -> Self {
        Self {
            value: None,
            validation,
            error: Some(error),
        }
    }

    /// No value and no error
    pub fn empty(validation: Option<ValidationResult>) -> Self {
        Self {
            value: None,
            validation,
            error: None,
        }
    }

    /// True when there is an error but nothing usable was produced
    pub fn is_fatal(&self) -> bool {
        self.value.is_none() && self.error.is_some()
    }

    pub fn is_partial(&self) -> bool {
        self.value.is_some() && self.error.is_some()
    }
}

/// Imports a schedule file and creates a new schedule version
#[async_trait]
pub trait ScheduleImportService: Send + Sync {
    async fn import_schedule(
        &self,
        ctx: &RunContext,
        file_path: &Path,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
    ) -> ServiceOutcome<ScheduleVersion>;
}

/// Pulls assignments from the external schedule
#[async_trait]
pub trait ScheduleScrapeService: Send + Sync {
    async fn scrape_schedule(
        &self,
        ctx: &RunContext,
        start_date: NaiveDate,
        month_count: u32,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
    ) -> ServiceOutcome<Vec<Assignment>>;
}

/// Computes coverage metrics for a schedule version
#[async_trait]
pub trait CoverageCalculator: Send + Sync {
    async fn calculate(
        &self,
        ctx: &RunContext,
        schedule_version_id: &ScheduleVersionId,
    ) -> Result<CoverageMetrics>;
}
