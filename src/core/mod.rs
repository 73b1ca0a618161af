//! Core business logic for ShiftSync.
//!
//! # Modules
//!
//! - [`context`] - Cancellation handle passed through every phase
//! - [`orchestrator`] - Three-phase import workflow, error classification and
//!   transaction scoping
//!
//! # Import Workflow
//!
//! 1. **Import**: Parse the schedule file and create a schedule version
//! 2. **Scrape**: Pull assignments from the external schedule for the
//!    version's date range
//! 3. **Coverage**: Calculate coverage for the new version
//!
//! Each phase commits independently. Only a fatal import failure fails the
//! run; scrape and coverage problems are reported as warnings.
//!
//! # Example
//!
//! ```rust,no_run
//! use shiftsync::core::context::RunContext;
//! use shiftsync::core::orchestrator::ScheduleOrchestrator;
//! use shiftsync::domain::{ActorId, OrganizationId};
//! use std::path::Path;
//!
//! # async fn example(orchestrator: ScheduleOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
//! let (_shutdown_tx, ctx) = RunContext::channel();
//!
//! let result = orchestrator
//!     .execute_import(
//!         &ctx,
//!         Path::new("schedule.ods"),
//!         OrganizationId::generate(),
//!         ActorId::generate(),
//!     )
//!     .await?;
//!
//! println!("Assignments: {}", result.assignments.len());
//! println!("Warnings: {}", result.validation_result.warning_count());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod orchestrator;
