//! Import orchestration
//!
//! - [`coordinator`] - drives a run through its three phases
//! - [`propagation`] - classifies diagnostics and decides whether to continue
//! - [`transaction`] - phase-scoped transactions
//! - [`services`] - contracts for the import, scrape and coverage collaborators
//! - [`summary`] - the aggregated run result

pub mod coordinator;
pub mod phase;
pub mod propagation;
pub mod services;
pub mod summary;
pub mod transaction;

pub use coordinator::{scrape_window, ScheduleOrchestrator};
pub use phase::{OrchestrationStatus, Phase};
pub use propagation::{ErrorPropagator, SeverityPolicy};
pub use services::{
    CoverageCalculator, ScheduleImportService, ScheduleScrapeService, ServiceOutcome,
};
pub use summary::{OrchestrationResult, PhaseOutcome, PhaseSummary};
pub use transaction::TransactionManager;
