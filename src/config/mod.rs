//! Configuration management for ShiftSync.
//!
//! ShiftSync reads a TOML file (`shiftsync.toml` by default) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SHIFTSYNC_<SECTION>_<KEY>` overrides
//! - Default values for every optional section
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [database]
//! connection_string = "${SHIFTSYNC_DATABASE_URL}"
//! max_connections = 10
//!
//! [orchestrator]
//! source_label = "ods_file"
//! max_scrape_months = 6
//!
//! [policy.scrape]
//! major = "continue"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use shiftsync::config::load_config;
//!
//! # fn example() {
//! match load_config("shiftsync.toml") {
//!     Ok(config) => println!("Source label: {}", config.orchestrator.source_label),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ClassificationConfig, DatabaseConfig, Environment, LoggingConfig,
    OrchestratorConfig, PhasePolicyConfig, PolicyConfig, ShiftSyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
