//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the ShiftSync configuration file.

use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `load_config` already validates, so a load failure covers both parse
    /// and validation errors.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Import Source: {}", config.orchestrator.source_label);
        println!("  Transactional: {}", config.orchestrator.transactional);
        println!(
            "  Scrape Window: {}-{} months",
            config.orchestrator.min_scrape_months, config.orchestrator.max_scrape_months
        );

        if let Some(ref database) = config.database {
            println!(
                "  PostgreSQL Connection: {}",
                database.connection_string.expose_secret().redacted_url()
            );
            println!("  Max Connections: {}", database.max_connections);
            println!("  Isolation Level: {}", database.isolation_level);
        }

        println!(
            "  Classification Patterns: {} critical, {} major",
            config.classification.critical_patterns.len(),
            config.classification.major_patterns.len()
        );
        println!();
        Ok(0)
    }
}
