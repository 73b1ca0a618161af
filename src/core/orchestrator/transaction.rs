//! Per-phase transaction scoping
//!
//! Each workflow phase runs inside its own READ COMMITTED transaction. The
//! unit of work decides the outcome: `Ok` or a warning commits, any other
//! error rolls back. Phases never share a transaction and a committed phase
//! is not compensated when a later phase fails.

use super::phase::Phase;
use crate::adapters::database::traits::{
    IsolationLevel, Transaction, TransactionBeginner, TransactionOptions,
};
use crate::config::DatabaseConfig;
use crate::core::context::RunContext;
use crate::domain::{Result, ShiftSyncError, Warnable};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

const AUDIT_TARGET: &str = "shiftsync::audit";

/// Runs units of work inside phase-scoped transactions
pub struct TransactionManager {
    db: Arc<dyn TransactionBeginner>,
    options: TransactionOptions,
}

impl TransactionManager {
    pub fn new(db: Arc<dyn TransactionBeginner>) -> Self {
        Self {
            db,
            options: TransactionOptions::read_committed(),
        }
    }

    /// Uses the isolation level from the `[database]` section
    pub fn configured(db: Arc<dyn TransactionBeginner>, config: &DatabaseConfig) -> Self {
        Self {
            db,
            options: TransactionOptions::from(config),
        }
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.options.isolation
    }

    /// Runs the schedule import unit
    pub async fn phase1_transaction<T, F, Fut>(&self, ctx: &RunContext, unit: F) -> Result<T>
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_phase_transaction(ctx, Phase::Import, unit)
            .await
    }

    /// Runs the schedule scrape unit
    pub async fn phase2_transaction<T, F, Fut>(&self, ctx: &RunContext, unit: F) -> Result<T>
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_phase_transaction(ctx, Phase::Scrape, unit)
            .await
    }

    /// Runs the coverage calculation unit
    pub async fn phase3_transaction<T, F, Fut>(&self, ctx: &RunContext, unit: F) -> Result<T>
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_phase_transaction(ctx, Phase::Coverage, unit)
            .await
    }

    /// Begins a transaction, runs `unit`, then commits or rolls back
    ///
    /// # Errors
    ///
    /// - [`ShiftSyncError::Cancelled`] if `ctx` is already cancelled; nothing
    ///   is begun.
    /// - [`ShiftSyncError::TransactionBegin`] if begin fails; `unit` is not run.
    /// - [`ShiftSyncError::TransactionCommit`] if commit fails (a best-effort
    ///   rollback is attempted first).
    /// - [`ShiftSyncError::TransactionRollback`] if the unit failed and the
    ///   rollback failed too.
    /// - Otherwise the unit's own error, including warnings after a commit.
    pub async fn execute_phase_transaction<T, F, Fut>(
        &self,
        ctx: &RunContext,
        phase: Phase,
        unit: F,
    ) -> Result<T>
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        ctx.check()?;

        let label = phase.audit_label();
        let started = Instant::now();

        let mut tx = self.db.begin(ctx, self.options).await.map_err(|e| {
            tracing::error!(target: AUDIT_TARGET, phase = label, error = %e, "Transaction begin failed");
            ShiftSyncError::TransactionBegin {
                phase: label.to_string(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(
            target: AUDIT_TARGET,
            phase = label,
            isolation = %self.options.isolation,
            "Transaction started"
        );

        match unit(ctx.clone()).await {
            Ok(value) => {
                self.commit(tx.as_mut(), label, None, started).await?;
                Ok(value)
            }
            Err(e) if Warnable::is_warning(&e) => {
                self.commit(tx.as_mut(), label, Some(&e), started).await?;
                Err(e)
            }
            Err(e) => Err(self.rollback(tx.as_mut(), label, e, started).await),
        }
    }

    async fn commit(
        &self,
        tx: &mut dyn Transaction,
        label: &str,
        warning: Option<&ShiftSyncError>,
        started: Instant,
    ) -> Result<()> {
        if let Err(commit_err) = tx.commit().await {
            tracing::error!(
                target: AUDIT_TARGET,
                phase = label,
                error = %commit_err,
                "Transaction commit failed"
            );
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    target: AUDIT_TARGET,
                    phase = label,
                    error = %rollback_err,
                    "Rollback after failed commit also failed"
                );
            }
            return Err(ShiftSyncError::TransactionCommit {
                phase: label.to_string(),
                message: commit_err.to_string(),
            });
        }

        match warning {
            Some(warning) => tracing::warn!(
                target: AUDIT_TARGET,
                phase = label,
                warning = %warning,
                duration_ms = started.elapsed().as_millis() as u64,
                "Transaction committed with warnings"
            ),
            None => tracing::info!(
                target: AUDIT_TARGET,
                phase = label,
                duration_ms = started.elapsed().as_millis() as u64,
                "Transaction committed"
            ),
        }
        Ok(())
    }

    async fn rollback(
        &self,
        tx: &mut dyn Transaction,
        label: &str,
        cause: ShiftSyncError,
        started: Instant,
    ) -> ShiftSyncError {
        match tx.rollback().await {
            Ok(()) => {
                tracing::warn!(
                    target: AUDIT_TARGET,
                    phase = label,
                    error = %cause,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Transaction rolled back"
                );
                cause
            }
            Err(rollback_err) => {
                tracing::error!(
                    target: AUDIT_TARGET,
                    phase = label,
                    error = %cause,
                    rollback_error = %rollback_err,
                    "Transaction rollback failed"
                );
                ShiftSyncError::TransactionRollback {
                    phase: label.to_string(),
                    cause: cause.to_string(),
                    rollback: rollback_err.to_string(),
                }
            }
        }
    }
}
