//! Schedule orchestrator - drives the three-phase import workflow
//!
//! A run imports a schedule file (phase 1), scrapes the external schedule for
//! assignments (phase 2) and calculates coverage (phase 3). Only phase 1 can
//! fail a run; phases 2 and 3 degrade to warnings on the result.
//!
//! # Status
//!
//! The orchestrator keeps a single status field that every run writes. Use
//! one instance per logical run when status polling matters; concurrent runs
//! on a shared instance overwrite each other's status. Each result carries
//! its own `run_id` for correlation.

use super::phase::{OrchestrationStatus, Phase};
use super::propagation::ErrorPropagator;
use super::services::{
    CoverageCalculator, ScheduleImportService, ScheduleScrapeService, ServiceOutcome,
};
use super::summary::{OrchestrationResult, PhaseOutcome, PhaseSummary};
use super::transaction::TransactionManager;
use crate::config::{OrchestratorConfig, ShiftSyncConfig};
use crate::core::context::RunContext;
use crate::domain::{
    ActorId, Assignment, CoverageMetrics, Disposition, OrganizationId, Result, ScheduleVersion,
    Severity, ShiftSyncError, ValidationMessage, ValidationResult,
};
use crate::{log_phase_complete, log_phase_start};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

const IMPORT_PARTIAL_WARNING: &str = "Some shifts failed to import";
const IMPORT_SUCCESS_INFO: &str = "Schedule imported successfully";
const SCRAPE_WARNING: &str = "Amion scraping encountered errors (continuing)";
const COVERAGE_WARNING: &str = "Coverage calculation failed (can be recalculated later)";

/// Computes the scrape window for a schedule version
///
/// Starts on the schedule's first day and spans one month per 30 days of
/// schedule, clamped to the configured bounds.
pub fn scrape_window(version: &ScheduleVersion, config: &OrchestratorConfig) -> (NaiveDate, u32) {
    let days = (version.end_date - version.start_date).num_days().max(0);
    let months = u32::try_from(days / 30).unwrap_or(u32::MAX);
    let months = months
        .max(config.min_scrape_months)
        .min(config.max_scrape_months.max(config.min_scrape_months));
    (version.start_date, months)
}

/// Drives the import, scrape and coverage phases
pub struct ScheduleOrchestrator {
    importer: Arc<dyn ScheduleImportService>,
    scraper: Arc<dyn ScheduleScrapeService>,
    coverage: Arc<dyn CoverageCalculator>,
    propagator: ErrorPropagator,
    transactions: Option<Arc<TransactionManager>>,
    config: OrchestratorConfig,
    status: AtomicU8,
}

/// Diagnostics gathered while a run is in flight
#[derive(Default)]
struct RunLedger {
    phase_results: BTreeMap<Phase, ValidationResult>,
    notes: ValidationResult,
    phases: Vec<PhaseSummary>,
}

impl RunLedger {
    fn record_diagnostics(&mut self, phase: Phase, validation: Option<&ValidationResult>) {
        if let Some(validation) = validation {
            self.phase_results
                .entry(phase)
                .or_default()
                .merge_from(&validation.with_field_prefix(phase.field_prefix()));
        }
    }

    fn warn(&mut self, phase: Phase, text: &str, error: Option<&ShiftSyncError>) {
        let mut message = ValidationMessage::new(Severity::Warning, phase.warning_field(), text);
        if let Some(error) = error {
            message = message.with_context("error", error.to_string());
        }
        self.notes.push(message);
    }

    fn finish_phase(&mut self, summary: PhaseSummary) {
        log_phase_complete!(summary.phase, summary.outcome, summary.duration);
        self.phases.push(summary);
    }
}

impl ScheduleOrchestrator {
    /// Creates an orchestrator with the built-in classification policy and
    /// no transaction scoping
    pub fn new(
        importer: Arc<dyn ScheduleImportService>,
        scraper: Arc<dyn ScheduleScrapeService>,
        coverage: Arc<dyn CoverageCalculator>,
    ) -> Self {
        Self {
            importer,
            scraper,
            coverage,
            propagator: ErrorPropagator::new(),
            transactions: None,
            config: OrchestratorConfig::default(),
            status: AtomicU8::new(OrchestrationStatus::Idle as u8),
        }
    }

    /// Applies the `[orchestrator]`, `[classification]` and `[policy]` sections
    pub fn configured(mut self, config: &ShiftSyncConfig) -> Self {
        self.propagator = ErrorPropagator::from_config(&config.classification, &config.policy);
        self.config = config.orchestrator.clone();
        self
    }

    /// Runs every phase inside its own database transaction
    pub fn with_transactions(mut self, transactions: Arc<TransactionManager>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn with_propagator(mut self, propagator: ErrorPropagator) -> Self {
        self.propagator = propagator;
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Status written by the most recent state transition of any run
    pub fn orchestration_status(&self) -> OrchestrationStatus {
        OrchestrationStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    fn set_status(&self, status: OrchestrationStatus) {
        self.status.store(status as u8, Ordering::SeqCst);
    }

    /// Executes a complete import run
    ///
    /// Returns `Ok` whenever phase 1 produced a usable result, even if phases
    /// 2 or 3 failed; check `result.validation_result.has_errors()` or the
    /// per-phase summaries for those.
    ///
    /// # Errors
    ///
    /// - [`ShiftSyncError::Validation`] for a nil organization or actor ID
    /// - [`ShiftSyncError::Cancelled`] if `ctx` is cancelled at entry
    /// - [`ShiftSyncError::PhaseFailed`] or a transaction error when phase 1
    ///   fails fatally
    pub async fn execute_import(
        &self,
        ctx: &RunContext,
        file_path: &Path,
        organization_id: OrganizationId,
        actor_id: ActorId,
    ) -> Result<OrchestrationResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "import_run",
            %run_id,
            organization_id = %organization_id,
        );

        async {
            let outcome = self
                .run(ctx, run_id, file_path, organization_id, actor_id)
                .await;
            match &outcome {
                Ok(_) => self.set_status(OrchestrationStatus::Completed),
                Err(e) => {
                    tracing::error!(error = %e, "Import orchestration failed");
                    self.set_status(OrchestrationStatus::Failed);
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        ctx: &RunContext,
        run_id: Uuid,
        file_path: &Path,
        organization_id: OrganizationId,
        actor_id: ActorId,
    ) -> Result<OrchestrationResult> {
        self.set_status(OrchestrationStatus::InProgress);
        let started = Instant::now();

        if organization_id.is_nil() {
            return Err(ShiftSyncError::Validation(format!(
                "invalid {}: nil UUID",
                OrganizationId::label()
            )));
        }
        if actor_id.is_nil() {
            return Err(ShiftSyncError::Validation(format!(
                "invalid {}: nil UUID",
                ActorId::label()
            )));
        }
        ctx.check()?;

        tracing::debug!(
            file_path = %file_path.display(),
            actor_id = %actor_id,
            transactional = self.transactions.is_some(),
            "Orchestration started"
        );

        let mut ledger = RunLedger::default();

        let schedule_version = self
            .import_phase(ctx, run_id, file_path, &organization_id, &actor_id, &mut ledger)
            .await?;

        let (assignments, coverage) = match &schedule_version {
            Some(version) => {
                let assignments = self
                    .scrape_phase(ctx, run_id, version, &organization_id, &actor_id, &mut ledger)
                    .await;
                let coverage = self.coverage_phase(ctx, run_id, version, &mut ledger).await;
                (assignments, coverage)
            }
            None => {
                tracing::warn!("Skipping scrape and coverage: no schedule version created");
                for phase in [Phase::Scrape, Phase::Coverage] {
                    ledger.finish_phase(PhaseSummary::skipped(
                        phase,
                        "no schedule version created",
                    ));
                }
                (Vec::new(), None)
            }
        };

        let mut validation_result = self
            .propagator
            .merge_with_phase_context(&ledger.phase_results);
        validation_result.merge_from(&ledger.notes);

        let completed_at = Utc::now();
        let metadata = self.metadata(
            run_id,
            file_path,
            &organization_id,
            &actor_id,
            completed_at,
            &ledger.phases,
        );

        let result = OrchestrationResult {
            run_id,
            schedule_version,
            assignments,
            coverage,
            validation_result,
            duration: started.elapsed(),
            completed_at,
            metadata,
            phases: ledger.phases,
        };
        result.log_summary();
        Ok(result)
    }

    async fn import_phase(
        &self,
        ctx: &RunContext,
        run_id: Uuid,
        file_path: &Path,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
        ledger: &mut RunLedger,
    ) -> Result<Option<ScheduleVersion>> {
        let phase = Phase::Import;
        log_phase_start!(phase, run_id);
        let started = Instant::now();

        let mut captured: Option<ServiceOutcome<ScheduleVersion>> = None;
        let slot = &mut captured;
        let importer = &self.importer;
        let committed = self
            .run_in_phase(ctx, phase, move |ctx| async move {
                let outcome = importer
                    .import_schedule(&ctx, file_path, organization_id, actor_id)
                    .await;
                let verdict = self.import_verdict(&outcome);
                *slot = Some(outcome);
                verdict
            })
            .await;

        let outcome = captured.unwrap_or_else(|| ServiceOutcome::empty(None));
        ledger.record_diagnostics(phase, outcome.validation.as_ref());

        let partial = match committed {
            Ok(()) => false,
            Err(e) if e.is_warning() => true,
            Err(e) => {
                ledger.finish_phase(
                    PhaseSummary::new(phase, PhaseOutcome::Failed, started.elapsed())
                        .with_message(e.to_string()),
                );
                return Err(e);
            }
        };

        let Some(version) = outcome.value else {
            ledger.finish_phase(
                PhaseSummary::new(phase, PhaseOutcome::Succeeded, started.elapsed())
                    .with_message("no schedule version created"),
            );
            return Ok(None);
        };

        if partial {
            tracing::warn!(
                schedule_version_id = %version.id,
                error = ?outcome.error.as_ref().map(ToString::to_string),
                "Partial import: schedule created despite some shift failures"
            );
            ledger.warn(phase, IMPORT_PARTIAL_WARNING, outcome.error.as_ref());
        }

        tracing::info!(
            schedule_version_id = %version.id,
            version = version.version,
            "Schedule imported"
        );
        ledger.notes.add_info(phase.warning_field(), IMPORT_SUCCESS_INFO);
        ledger.finish_phase(PhaseSummary::new(
            phase,
            if partial {
                PhaseOutcome::PartialSuccess
            } else {
                PhaseOutcome::Succeeded
            },
            started.elapsed(),
        ));

        Ok(Some(version))
    }

    /// Commit/rollback decision for the import unit of work
    fn import_verdict(&self, outcome: &ServiceOutcome<ScheduleVersion>) -> Result<()> {
        if outcome.is_fatal() {
            let message = outcome
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(phase_failure(Phase::Import, message));
        }

        if let Some(validation) = &outcome.validation {
            if !self.propagator.should_continue(validation, Phase::Import) {
                let blocking = validation
                    .errors
                    .iter()
                    .find(|m| {
                        self.propagator.policy().disposition(
                            Phase::Import,
                            self.propagator.classify_message(m),
                        ) == Disposition::Abort
                    })
                    .map(|m| m.text.clone())
                    .unwrap_or_default();
                return Err(phase_failure(
                    Phase::Import,
                    format!("blocking diagnostic: {blocking}"),
                ));
            }
        }

        match &outcome.error {
            Some(error) => Err(ShiftSyncError::warning(error.to_string())),
            None => Ok(()),
        }
    }

    async fn scrape_phase(
        &self,
        ctx: &RunContext,
        run_id: Uuid,
        version: &ScheduleVersion,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
        ledger: &mut RunLedger,
    ) -> Vec<Assignment> {
        let phase = Phase::Scrape;
        log_phase_start!(phase, run_id);
        let started = Instant::now();
        let (start_date, month_count) = scrape_window(version, &self.config);

        let mut captured: Option<ServiceOutcome<Vec<Assignment>>> = None;
        let slot = &mut captured;
        let scraper = &self.scraper;
        let propagator = &self.propagator;
        let committed = self
            .run_in_phase(ctx, phase, move |ctx| async move {
                let outcome = scraper
                    .scrape_schedule(&ctx, start_date, month_count, organization_id, actor_id)
                    .await;
                let verdict = secondary_verdict(propagator, phase, &outcome);
                *slot = Some(outcome);
                verdict
            })
            .await;

        let outcome = captured.unwrap_or_else(|| ServiceOutcome::empty(None));
        ledger.record_diagnostics(phase, outcome.validation.as_ref());

        match committed {
            Ok(()) => {
                let assignments = outcome.value.unwrap_or_default();
                if !assignments.is_empty() {
                    ledger.notes.add_info(
                        phase.warning_field(),
                        format!("Scraped {} assignments", assignments.len()),
                    );
                }
                ledger.finish_phase(PhaseSummary::new(
                    phase,
                    PhaseOutcome::Succeeded,
                    started.elapsed(),
                ));
                assignments
            }
            Err(e) if e.is_warning() => {
                tracing::warn!(error = %e, "Scrape returned errors (continuing to coverage)");
                ledger.warn(phase, SCRAPE_WARNING, outcome.error.as_ref());
                let kept = if outcome.is_partial() {
                    PhaseOutcome::PartialSuccess
                } else {
                    PhaseOutcome::Failed
                };
                ledger.finish_phase(
                    PhaseSummary::new(phase, kept, started.elapsed()).with_message(e.to_string()),
                );
                outcome.value.unwrap_or_default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scrape failed, records discarded (continuing to coverage)");
                ledger.warn(phase, SCRAPE_WARNING, Some(&e));
                ledger.finish_phase(
                    PhaseSummary::new(phase, PhaseOutcome::Failed, started.elapsed())
                        .with_message(e.to_string()),
                );
                Vec::new()
            }
        }
    }

    async fn coverage_phase(
        &self,
        ctx: &RunContext,
        run_id: Uuid,
        version: &ScheduleVersion,
        ledger: &mut RunLedger,
    ) -> Option<CoverageMetrics> {
        let phase = Phase::Coverage;
        log_phase_start!(phase, run_id);
        let started = Instant::now();

        let calculator = &self.coverage;
        let version_id = version.id;
        let calculated = self
            .run_in_phase(ctx, phase, move |ctx| async move {
                calculator.calculate(&ctx, &version_id).await
            })
            .await;

        match calculated {
            Ok(metrics) => {
                tracing::info!(
                    schedule_version_id = %version_id,
                    coverage_pct = metrics.coverage_percentage,
                    "Coverage calculated"
                );
                ledger.notes.add_info(
                    phase.warning_field(),
                    format!("Coverage: {:.1}%", metrics.coverage_percentage),
                );
                ledger.finish_phase(PhaseSummary::new(
                    phase,
                    PhaseOutcome::Succeeded,
                    started.elapsed(),
                ));
                Some(metrics)
            }
            Err(e) => {
                tracing::warn!(
                    schedule_version_id = %version_id,
                    error = %e,
                    "Coverage calculation failed (continuing)"
                );
                ledger.warn(phase, COVERAGE_WARNING, Some(&e));
                ledger.finish_phase(
                    PhaseSummary::new(phase, PhaseOutcome::Failed, started.elapsed())
                        .with_message(e.to_string()),
                );
                None
            }
        }
    }

    /// Runs `unit` in a phase transaction, or directly when none is configured
    async fn run_in_phase<T, F, Fut>(&self, ctx: &RunContext, phase: Phase, unit: F) -> Result<T>
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match &self.transactions {
            Some(transactions) => {
                transactions
                    .execute_phase_transaction(ctx, phase, unit)
                    .await
            }
            None => {
                ctx.check()?;
                unit(ctx.clone()).await
            }
        }
    }

    fn metadata(
        &self,
        run_id: Uuid,
        file_path: &Path,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
        completed_at: chrono::DateTime<Utc>,
        phases: &[PhaseSummary],
    ) -> BTreeMap<String, Value> {
        let attempted: Vec<Value> = phases
            .iter()
            .filter(|p| p.outcome != PhaseOutcome::Skipped)
            .map(|p| Value::from(p.phase.as_str()))
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert("run_id".to_string(), Value::from(run_id.to_string()));
        metadata.insert(
            "import_source".to_string(),
            Value::from(self.config.source_label.clone()),
        );
        metadata.insert(
            "organization_id".to_string(),
            Value::from(organization_id.to_string()),
        );
        metadata.insert("actor_id".to_string(), Value::from(actor_id.to_string()));
        metadata.insert(
            "file_path".to_string(),
            Value::from(file_path.display().to_string()),
        );
        metadata.insert(
            "completed_at".to_string(),
            Value::from(completed_at.to_rfc3339()),
        );
        metadata.insert("phases_attempted".to_string(), Value::Array(attempted));
        metadata
    }
}

fn phase_failure(phase: Phase, message: String) -> ShiftSyncError {
    ShiftSyncError::PhaseFailed {
        phase: phase.audit_label().to_string(),
        message,
    }
}

/// Commit/rollback decision for the scrape unit of work
///
/// Diagnostics or an error that the policy marks as aborting roll the phase
/// back; any other error commits as a warning.
fn secondary_verdict<T>(
    propagator: &ErrorPropagator,
    phase: Phase,
    outcome: &ServiceOutcome<T>,
) -> Result<()> {
    if let Some(validation) = &outcome.validation {
        if !propagator.should_continue(validation, phase) {
            return Err(phase_failure(
                phase,
                format!(
                    "blocking diagnostics among {} errors",
                    validation.error_count()
                ),
            ));
        }
    }

    match &outcome.error {
        None => Ok(()),
        Some(error) => {
            let severity = propagator.classify_error(error);
            if propagator.policy().disposition(phase, severity) == Disposition::Abort
            {
                Err(phase_failure(phase, error.to_string()))
            } else {
                Err(ShiftSyncError::warning(error.to_string()))
            }
        }
    }
}
