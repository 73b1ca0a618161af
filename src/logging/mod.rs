//! Logging and observability
//!
//! Structured logging via `tracing`, plus a few macros that keep the field
//! names of recurring workflow events consistent.
//!
//! # Example
//!
//! ```no_run
//! use shiftsync::logging::init_logging;
//! use shiftsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(organization_id = "7d44b88c", "Import requested");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a workflow phase
///
/// # Example
///
/// ```no_run
/// use shiftsync::log_phase_start;
/// use shiftsync::core::orchestrator::Phase;
///
/// let run_id = uuid::Uuid::new_v4();
/// log_phase_start!(Phase::Import, run_id);
/// ```
#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $run_id:expr) => {
        tracing::info!(
            phase = %$phase,
            run_id = %$run_id,
            "Phase started"
        );
    };
}

/// Log the completion of a workflow phase
///
/// # Example
///
/// ```no_run
/// use shiftsync::log_phase_complete;
/// use shiftsync::core::orchestrator::{Phase, PhaseOutcome};
/// use std::time::Duration;
///
/// log_phase_complete!(Phase::Scrape, PhaseOutcome::Succeeded, Duration::from_millis(250));
/// ```
#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $outcome:expr, $duration:expr) => {
        tracing::info!(
            phase = %$phase,
            outcome = %$outcome,
            duration_ms = $duration.as_millis() as u64,
            "Phase completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use shiftsync::log_error_with_context;
/// use shiftsync::domain::ShiftSyncError;
///
/// let error = ShiftSyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
