// ShiftSync - Schedule Import Orchestration Engine
// Copyright (c) 2025 ShiftSync Contributors
// Licensed under the MIT License

//! # ShiftSync - Schedule Import Orchestration
//!
//! ShiftSync coordinates the import of hospital shift schedules. A run takes
//! an uploaded schedule file through three phases:
//!
//! 1. **Import** the file into a new schedule version
//! 2. **Scrape** assignments from the external scheduling system
//! 3. **Calculate** coverage for the new version
//!
//! Diagnostics from every phase are merged into one
//! [`domain::ValidationResult`], classified by severity, and used to decide
//! whether the run continues. Each phase runs in its own READ COMMITTED
//! transaction.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Orchestrator, error propagation, transaction scoping
//! - [`adapters`] - Database integration (PostgreSQL)
//! - [`domain`] - Domain types, diagnostics and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shiftsync::adapters::database::create_transaction_beginner;
//! use shiftsync::config::load_config;
//! use shiftsync::core::context::RunContext;
//! use shiftsync::core::orchestrator::{
//!     CoverageCalculator, ScheduleImportService, ScheduleOrchestrator, ScheduleScrapeService,
//!     TransactionManager,
//! };
//! use shiftsync::domain::{ActorId, OrganizationId};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     importer: Arc<dyn ScheduleImportService>,
//! #     scraper: Arc<dyn ScheduleScrapeService>,
//! #     coverage: Arc<dyn CoverageCalculator>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shiftsync.toml")?;
//!
//! let mut orchestrator =
//!     ScheduleOrchestrator::new(importer, scraper, coverage).configured(&config);
//! if let Some(database) = &config.database {
//!     let db = create_transaction_beginner(database)?;
//!     orchestrator = orchestrator
//!         .with_transactions(Arc::new(TransactionManager::configured(db, database)));
//! }
//!
//! let result = orchestrator
//!     .execute_import(
//!         &RunContext::background(),
//!         Path::new("schedule.ods"),
//!         OrganizationId::generate(),
//!         ActorId::generate(),
//!     )
//!     .await?;
//!
//! println!("Coverage: {:?}", result.coverage.map(|c| c.coverage_percentage));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ShiftSync uses [`domain::ShiftSyncError`] for all errors. A
//! [`domain::ShiftSyncError::Warning`] marks a non-fatal condition: a phase
//! that ends with one is still committed.
//!
//! ## Logging
//!
//! Structured logging with the `tracing` crate. Transaction events use the
//! `shiftsync::audit` target.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
